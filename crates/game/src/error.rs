use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("image sizes differ: {left:?} vs {right:?}")]
    DimensionMismatch { left: (u32, u32), right: (u32, u32) },
    #[error("stage {0} has no detectable difference")]
    NoDifference(u32),
    #[error("no playable stage could be loaded")]
    NoStages,
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
