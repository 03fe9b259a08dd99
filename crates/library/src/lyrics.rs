use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

/// Lyric sheets stored as `<dir>/<title>_game.txt`, one line per lyric line.
#[derive(Debug, Clone)]
pub struct LyricsStore {
    dir: PathBuf,
}

impl LyricsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Sheet path for `title`. Separators and control characters in the title become `_`
    /// so the sheet always sits directly in the store's directory.
    pub fn path_for(&self, title: &str) -> PathBuf {
        let name: String = title
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect();
        self.dir.join(format!("{name}_game.txt"))
    }

    /// Lyrics for `title`; an absent or unreadable sheet yields no lines.
    pub fn load(&self, title: &str) -> Vec<String> {
        let path = self.path_for(title);
        match read_lines(&path) {
            Ok(lines) => lines,
            Err(err) => {
                warn!(?path, "lyrics unavailable: {err:#}");
                Vec::new()
            }
        }
    }
}

/// Trimmed, non-empty lines of a UTF-8 text file.
pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err).with_context(|| format!("read lyrics {:?}", path)),
    };
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
