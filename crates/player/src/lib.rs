pub mod command;
pub mod controller;
pub mod media;
pub mod position;
pub mod shared;

pub use command::{Command, Effect, PlayerEvent};
pub use controller::PlaylistController;
pub use media::{MediaBridge, MediaPlayer, NullPlayer};
pub use position::{PositionReport, PositionReporter};
pub use shared::SharedController;
