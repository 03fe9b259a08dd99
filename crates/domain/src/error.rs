use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("nothing to play: the playlist is empty")]
    EmptyPlaylist,
    #[error("track {0:?} is not in the playlist")]
    UnknownTrack(String),
    #[error("track {0:?} appears more than once")]
    DuplicateTrack(String),
    #[error("track index {index} is out of range for a playlist of {len}")]
    InvalidIndex { index: usize, len: usize },
    #[error("invalid playlist order: {0}")]
    InvalidOrder(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl DomainError {
    pub fn invalid_order<T: Into<String>>(message: T) -> Self {
        Self::InvalidOrder(message.into())
    }
}
