use crate::error::Error;
use crate::puzzle::{MAX_DIM, MIN_DIM};

/// Grid side length used when nothing else is asked for.
pub const DEFAULT_DIM: usize = 3;

/// Slides replayed when a puzzle starts.
pub const DEFAULT_START_MOVES: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleConfig {
    pub dim: usize,
    pub shuffle_moves: usize,
    /// Fixed seed for reproducible boards; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            dim: DEFAULT_DIM,
            shuffle_moves: DEFAULT_START_MOVES,
            seed: None,
        }
    }
}

impl PuzzleConfig {
    pub fn with_dim(mut self, dim: usize) -> Self {
        self.dim = dim;
        self
    }

    pub fn with_shuffle_moves(mut self, moves: usize) -> Self {
        self.shuffle_moves = moves;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !(MIN_DIM..=MAX_DIM).contains(&self.dim) {
            return Err(Error::InvalidDimension {
                dim: self.dim,
                min: MIN_DIM,
                max: MAX_DIM,
            });
        }
        Ok(())
    }
}
