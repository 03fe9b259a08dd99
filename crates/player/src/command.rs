use serde::{Deserialize, Serialize};

use musiquest_domain::{RepeatMode, Track};

use crate::position::PositionReport;

/// Notifications emitted by the media player on its own clock.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerEvent {
    PositionChanged(u64),
    DurationChanged(u64),
    EndOfMedia,
}

/// Everything that can change playback state. Input handlers translate clicks, keys and
/// drag-drops into one of these and hand it to [`PlaylistController::dispatch`].
///
/// [`PlaylistController::dispatch`]: crate::PlaylistController::dispatch
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Load(Vec<Track>),
    Select(usize),
    Next,
    Previous,
    /// New order of the whole playlist, by filename.
    Reorder(Vec<String>),
    ToggleShuffle,
    ToggleRepeat,
    Seek(u64),
    Player(PlayerEvent),
}

/// What the outside world has to do after a command: instructions for the media
/// player, and which parts of any view need refreshing.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Play(Track),
    Stop,
    Seek(u64),
    PlaylistChanged,
    SelectionChanged(Option<usize>),
    ModesChanged { shuffle: bool, repeat: RepeatMode },
    Progress(PositionReport),
}
