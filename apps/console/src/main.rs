mod app;
mod input;
mod settings;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use musiquest_library::AssetLayout;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::app::{App, Step};
use crate::settings::{load_or_default, save_settings, settings_path};

#[derive(Parser, Debug)]
#[command(author, version, about = "Music player with a spot-the-difference lyric game", long_about = None)]
struct Cli {
    /// Name of the signed-in user
    #[arg(short, long, default_value = "guest")]
    user: String,
    /// Root of the asset tree (music/, lyrics/, images/)
    #[arg(long)]
    assets_dir: Option<PathBuf>,
    /// Directory scanned for tracks; defaults to <assets>/music
    #[arg(long)]
    music_dir: Option<PathBuf>,
    /// Settings file to use instead of the per-user one
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.clone().or_else(settings_path);
    let mut settings = load_or_default(config_path.as_deref());

    let assets_dir = cli
        .assets_dir
        .or_else(|| settings.assets_dir.clone())
        .unwrap_or_else(|| PathBuf::from("assets"));
    let layout = AssetLayout::new(&assets_dir);
    let music_dir = cli
        .music_dir
        .or_else(|| settings.music_dir.clone())
        .unwrap_or_else(|| layout.music_dir());
    info!(?assets_dir, ?music_dir, user = %cli.user, "starting");

    let mut app = App::new(layout, music_dir, &settings)?;
    println!("Hello, {}", cli.user);
    for line in app.playlist_lines() {
        println!("{line}");
    }
    println!("Type `help` for commands.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let parsed = match input::parse(&line) {
            Ok(Some(parsed)) => parsed,
            Ok(None) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        match app.handle(parsed) {
            Step::Continue(lines) => lines.iter().for_each(|l| println!("{l}")),
            Step::Quit(lines) => {
                lines.iter().for_each(|l| println!("{l}"));
                break;
            }
        }
    }

    settings.assets_dir = Some(assets_dir);
    app.export_settings(&mut settings);
    if let Some(path) = config_path {
        if let Err(err) = save_settings(&path, &settings) {
            error!("could not save settings: {err:#}");
        }
    }
    Ok(())
}
