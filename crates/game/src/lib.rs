pub mod cursor;
pub mod detect;
pub mod error;
pub mod progress;
pub mod region;
pub mod session;
pub mod stage;

pub use cursor::{CursorBox, CursorConfig, Direction};
pub use detect::{DetectorConfig, DifferenceDetector};
pub use error::GameError;
pub use progress::{LyricProgress, RevealedLines, RevealedSlice};
pub use region::{AnswerRegion, Rect};
pub use session::{GameConfig, GamePhase, GameSession, SelectionOutcome};
pub use stage::{FileStages, ImagePair, Stage, StageProvider};
