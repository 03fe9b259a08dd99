use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// A playable item. Two tracks are the same track when their filenames match.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Track {
    pub filename: String,
    pub title: String,
    /// Length reported by the container, when it reports one.
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

impl Track {
    pub fn new(filename: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            title: title.into(),
            duration_ms: None,
        }
    }
}

/// Ordered tracks in playback order. Filenames are unique.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>) -> Result<Self, DomainError> {
        let mut seen = HashSet::with_capacity(tracks.len());
        for track in &tracks {
            if !seen.insert(track.filename.as_str()) {
                return Err(DomainError::DuplicateTrack(track.filename.clone()));
            }
        }
        Ok(Self { tracks })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn position_of(&self, filename: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.filename == filename)
    }

    pub fn filenames(&self) -> Vec<String> {
        self.tracks.iter().map(|t| t.filename.clone()).collect()
    }

    /// Rearranges the tracks to follow `order`, which must name every track exactly once.
    /// The playlist is left untouched when the order is rejected.
    pub fn reorder<S: AsRef<str>>(&mut self, order: &[S]) -> Result<(), DomainError> {
        let mut by_name: HashMap<&str, usize> = self
            .tracks
            .iter()
            .enumerate()
            .map(|(idx, t)| (t.filename.as_str(), idx))
            .collect();

        let mut picked = Vec::with_capacity(order.len());
        for name in order {
            let name = name.as_ref();
            match by_name.remove(name) {
                Some(idx) => picked.push(idx),
                None if self.position_of(name).is_some() => {
                    return Err(DomainError::DuplicateTrack(name.to_string()))
                }
                None => return Err(DomainError::UnknownTrack(name.to_string())),
            }
        }
        if !by_name.is_empty() {
            return Err(DomainError::invalid_order(format!(
                "{} track(s) missing from the new order",
                by_name.len()
            )));
        }

        let reordered: Vec<Track> = picked.into_iter().map(|idx| self.tracks[idx].clone()).collect();
        self.tracks = reordered;
        Ok(())
    }
}
