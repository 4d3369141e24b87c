use thiserror::Error;

/// Failures while setting up a puzzle. Gameplay itself never fails: an
/// illegal move is ignored, not reported.
#[derive(Debug, Error)]
pub enum Error {
    #[error("grid dimension {dim} is outside the supported range {min}..={max}")]
    InvalidDimension { dim: usize, min: usize, max: usize },

    #[error("picture is {width}x{height} but a {dim}x{dim} grid needs at least one cell per tile")]
    PictureTooSmall {
        width: usize,
        height: usize,
        dim: usize,
    },

    #[error("picture has no content")]
    EmptyPicture,

    #[error("failed to read picture: {0}")]
    Io(#[from] std::io::Error),
}
