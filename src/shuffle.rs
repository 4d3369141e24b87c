//! Randomizes a board by replaying legal moves from its current state.
//!
//! Every step is a legal slide, so the result is always solvable. Permuting
//! the tiles directly would give an unsolvable board half of the time.

use rand::seq::IteratorRandom;
use rand::Rng;
use tracing::debug;

use crate::puzzle::{Grid, Move};

/// Slides the empty slot `move_count` times, each time to a uniformly chosen
/// in-bounds neighbour. Returns the directions taken, oldest first.
pub fn shuffle<R: Rng + ?Sized>(grid: &mut Grid, move_count: usize, rng: &mut R) -> Vec<Move> {
    let mut history = Vec::with_capacity(move_count);

    for _ in 0..move_count {
        let empty = grid.empty_pos();
        // A board of dim >= 2 always has at least two neighbours per slot.
        let Some((dir, target)) = grid.neighbors(empty).choose(rng) else {
            break;
        };
        grid.move_empty_to(target);
        history.push(dir);
    }

    debug!(
        moves = history.len(),
        empty = %grid.empty_pos(),
        "shuffled board"
    );
    history
}

/// Undoes a shuffle history, newest move first.
pub fn unwind(grid: &mut Grid, history: &[Move]) -> bool {
    history
        .iter()
        .rev()
        .all(|movement| grid.apply_move(movement.opposite()))
}
