use anyhow::Context;
use clap::Parser;
use musiquest_game::{DetectorConfig, DifferenceDetector};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Locate the difference between two pictures", long_about = None)]
struct Cli {
    /// Path to the original picture
    original: String,
    /// Path to the altered picture
    modified: String,
    /// Grey-level difference that counts as a change
    #[arg(short, long, default_value_t = 30)]
    threshold: u8,
    /// Changed areas not larger than this many pixels are ignored
    #[arg(long, default_value_t = 100)]
    min_area: u64,
    /// List every region instead of one enclosing box
    #[arg(long)]
    all: bool,
}

#[derive(Serialize)]
struct Report<T> {
    original: String,
    modified: String,
    regions: T,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let detector = DifferenceDetector::new(DetectorConfig {
        threshold: cli.threshold,
        min_area: cli.min_area,
        ..Default::default()
    });
    let original = image::open(&cli.original)
        .with_context(|| format!("open original picture {}", cli.original))?;
    let modified = image::open(&cli.modified)
        .with_context(|| format!("open altered picture {}", cli.modified))?;
    let original = detector.normalize(&original);
    let modified = detector.normalize(&modified);

    let regions = if cli.all {
        detector.detect_all(&original, &modified)?
    } else {
        let region = detector.detect(&original, &modified)?;
        if region.is_empty() {
            info!("no qualifying difference");
            Vec::new()
        } else {
            vec![region]
        }
    };
    let report = Report {
        original: cli.original,
        modified: cli.modified,
        regions,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
