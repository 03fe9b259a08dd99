pub mod lyrics;
pub mod probe;
pub mod scan;
pub mod stages;

use std::path::PathBuf;

pub use lyrics::LyricsStore;
pub use probe::{probe_track, TrackInfo};
pub use scan::TrackScanner;
pub use stages::{scan_image_pairs, ImagePairPaths};

/// Where assets live under one root directory.
#[derive(Debug, Clone)]
pub struct AssetLayout {
    root: PathBuf,
}

impl AssetLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn music_dir(&self) -> PathBuf {
        self.root.join("music")
    }

    pub fn lyrics_dir(&self) -> PathBuf {
        self.root.join("lyrics")
    }

    pub fn original_images_dir(&self) -> PathBuf {
        self.root.join("images").join("original")
    }

    pub fn modified_images_dir(&self) -> PathBuf {
        self.root.join("images").join("modified")
    }

    pub fn lyrics(&self) -> LyricsStore {
        LyricsStore::new(self.lyrics_dir())
    }

    pub fn image_pairs(&self) -> anyhow::Result<Vec<ImagePairPaths>> {
        scan_image_pairs(self.original_images_dir(), self.modified_images_dir())
    }
}
