//! Sliding-tile picture puzzle.
//!
//! A picture is cut into a square grid of tiles with one slot left empty.
//! The board starts solved, is scrambled by replaying random legal slides,
//! and is solved again by sliding tiles next to the hole into it.
//!
//! The engine knows nothing about drawing or input devices: hosts paint
//! through [`render::Surface`] and translate pointer or key input through
//! [`input`] before calling [`Session::attempt_move`].

pub mod config;
pub mod error;
pub mod input;
pub mod picture;
pub mod puzzle;
pub mod render;
pub mod session;
pub mod shuffle;

pub use config::PuzzleConfig;
pub use error::Error;
pub use puzzle::{Coord, Grid, Move, Tile};
pub use session::{Event, MoveOutcome, Phase, Rejection, Session};
