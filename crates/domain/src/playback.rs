use serde::{Deserialize, Serialize};

/// Looping policy applied when a track reaches its end.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RepeatMode {
    /// Stop after the last track.
    #[default]
    Off,
    /// Wrap around to the first track.
    All,
    /// Loop the current track.
    One,
}

impl RepeatMode {
    /// Off -> All -> One -> Off.
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RepeatMode::Off => "Repeat Off",
            RepeatMode::All => "Repeat All",
            RepeatMode::One => "Repeat One",
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlaybackState {
    /// `None` until a track has been selected.
    pub current_index: Option<usize>,
    pub shuffle: bool,
    pub repeat: RepeatMode,
    pub position_ms: u64,
    pub duration_ms: u64,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears everything tied to the current media, keeping the user's shuffle/repeat choice.
    pub fn reset_media(&mut self) {
        self.current_index = None;
        self.position_ms = 0;
        self.duration_ms = 0;
    }
}
