use serde::{Deserialize, Serialize};

use crate::{error::DomainError, track::Playlist};

/// Persisted playlist ordering, keyed by filename.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlaylistOrder {
    pub filenames: Vec<String>,
}

impl PlaylistOrder {
    pub fn of(playlist: &Playlist) -> Self {
        Self {
            filenames: playlist.filenames(),
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>, DomainError> {
        serde_json::to_vec_pretty(self).map_err(|err| DomainError::Serialization(err.to_string()))
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, DomainError> {
        serde_json::from_slice(bytes).map_err(|err| DomainError::Serialization(err.to_string()))
    }

    /// Applies the saved order to a freshly scanned playlist. Tracks that disappeared are
    /// dropped from the order and new tracks keep their scan order after the saved ones.
    pub fn apply(&self, playlist: &mut Playlist) -> Result<(), DomainError> {
        let mut order: Vec<&str> = self
            .filenames
            .iter()
            .map(String::as_str)
            .filter(|name| playlist.position_of(name).is_some())
            .collect();
        for track in playlist.tracks() {
            if !order.contains(&track.filename.as_str()) {
                order.push(track.filename.as_str());
            }
        }
        let order: Vec<String> = order.into_iter().map(str::to_string).collect();
        playlist.reorder(order.as_slice())
    }
}
