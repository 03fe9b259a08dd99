pub mod error;
pub mod io;
pub mod playback;
pub mod timecode;
pub mod track;

pub use crate::error::DomainError;
pub use crate::io::PlaylistOrder;
pub use crate::playback::{PlaybackState, RepeatMode};
pub use crate::timecode::{format_clock, format_progress};
pub use crate::track::{Playlist, Track};
