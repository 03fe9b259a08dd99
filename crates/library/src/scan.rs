use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use musiquest_domain::Track;

use crate::probe::probe_track;

pub const DEFAULT_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "ogg", "m4a"];

pub struct TrackScanner {
    extensions: Vec<String>,
    read_tags: bool,
}

impl TrackScanner {
    pub fn new() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            read_tags: true,
        }
    }

    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.into().to_ascii_lowercase())
            .collect();
        self
    }

    /// Skip container probing and title tracks by file stem only.
    pub fn without_tags(mut self) -> Self {
        self.read_tags = false;
        self
    }

    /// Tracks in `dir`, sorted by filename. A missing directory is an empty library.
    pub fn scan<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<Track>> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            warn!(?dir, "music directory not found");
            return Ok(Vec::new());
        }

        let mut filenames = Vec::new();
        for entry in fs::read_dir(dir).with_context(|| format!("read music directory {:?}", dir))? {
            let path = entry?.path();
            if !path.is_file() || !self.accepts(&path) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                filenames.push(name.to_string());
            }
        }
        filenames.sort();

        let tracks: Vec<Track> = filenames
            .into_iter()
            .map(|filename| self.describe(dir, filename))
            .collect();
        info!(count = tracks.len(), ?dir, "scanned music directory");
        Ok(tracks)
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }

    fn describe(&self, dir: &Path, filename: String) -> Track {
        let stem = Path::new(&filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(filename.as_str())
            .to_string();
        let mut track = Track::new(filename.clone(), stem);
        if self.read_tags {
            match probe_track(dir.join(&filename)) {
                Ok(info) => {
                    if let Some(title) = info.title {
                        track.title = title;
                    }
                    track.duration_ms = info.duration_ms;
                }
                Err(err) => debug!(%filename, "no readable tags: {err:#}"),
            }
        }
        track
    }
}

impl Default for TrackScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn scans_by_extension_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.wav", "a.WAV", "notes.txt", "c.mp3"] {
            File::create(dir.path().join(name)).unwrap();
        }
        fs::create_dir(dir.path().join("sub.wav")).unwrap();

        let tracks = TrackScanner::new().without_tags().scan(dir.path()).unwrap();
        let names: Vec<_> = tracks.iter().map(|t| t.filename.as_str()).collect();
        assert_eq!(names, vec!["a.WAV", "b.wav", "c.mp3"]);
        assert_eq!(tracks[1].title, "b");
    }

    #[test]
    fn restricts_extensions() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["x.wav", "y.mp3"] {
            File::create(dir.path().join(name)).unwrap();
        }
        let tracks = TrackScanner::new()
            .extensions(["wav"])
            .scan(dir.path())
            .unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].title, "x");
        assert_eq!(tracks[0].duration_ms, None);
    }

    #[test]
    fn tag_title_and_duration_override_stem() {
        let dir = tempfile::tempdir().unwrap();
        crate::probe::tests::write_wav(dir.path(), "01.wav", 2, Some("Morning Light"));
        crate::probe::tests::write_wav(dir.path(), "02.wav", 1, None);

        let tracks = TrackScanner::new().scan(dir.path()).unwrap();
        assert_eq!(tracks[0].title, "Morning Light");
        assert_eq!(tracks[0].duration_ms, Some(2_000));
        assert_eq!(tracks[1].title, "02");
        assert_eq!(tracks[1].duration_ms, Some(1_000));
    }

    #[test]
    fn missing_directory_is_empty() {
        let tracks = TrackScanner::new().scan("/no/such/music/dir").unwrap();
        assert!(tracks.is_empty());
    }
}
