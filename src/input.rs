//! Input adapter contract: pointer positions and direction keys become grid
//! coordinates for [`Session::attempt_move`](crate::session::Session::attempt_move).

use crate::puzzle::{Coord, Grid, Move};

/// Maps surface-local pointer positions onto slots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerMap {
    tile_width: f64,
    tile_height: f64,
}

impl PointerMap {
    pub fn new(tile_width: f64, tile_height: f64) -> Self {
        Self {
            tile_width,
            tile_height,
        }
    }

    pub fn for_surface(surface_width: f64, surface_height: f64, dim: usize) -> Self {
        Self::new(surface_width / dim as f64, surface_height / dim as f64)
    }

    /// `floor(pixel / tile)` on each axis. Positions left of or above the
    /// surface, and degenerate tile sizes, yield `None`. Positions past the
    /// far edge map to off-board coordinates, which the session ignores.
    pub fn to_grid(&self, px: f64, py: f64) -> Option<Coord> {
        let x = Self::axis(px, self.tile_width)?;
        let y = Self::axis(py, self.tile_height)?;
        Some(Coord::new(x, y))
    }

    fn axis(pixel: f64, tile: f64) -> Option<usize> {
        if !pixel.is_finite() || !tile.is_finite() || tile <= 0.0 || pixel < 0.0 {
            return None;
        }
        let cell = (pixel / tile).floor();
        (cell <= usize::MAX as f64).then_some(cell as usize)
    }
}

/// The slot a direction key targets: the tile that would slide into the
/// empty slot when the hole travels in `direction`.
pub fn key_target(grid: &Grid, direction: Move) -> Option<Coord> {
    grid.empty_pos().step(direction, grid.dim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floors_pixels_into_cells() {
        let map = PointerMap::for_surface(300.0, 300.0, 3);
        assert_eq!(map.to_grid(0.0, 0.0), Some(Coord::new(0, 0)));
        assert_eq!(map.to_grid(99.9, 100.0), Some(Coord::new(0, 1)));
        assert_eq!(map.to_grid(299.0, 250.5), Some(Coord::new(2, 2)));
    }

    #[test]
    fn past_the_edge_passes_through() {
        let map = PointerMap::new(10.0, 10.0);
        assert_eq!(map.to_grid(35.0, 5.0), Some(Coord::new(3, 0)));
    }

    #[test]
    fn negative_and_nonsense_input_is_dropped() {
        let map = PointerMap::new(10.0, 10.0);
        assert_eq!(map.to_grid(-0.5, 5.0), None);
        assert_eq!(map.to_grid(5.0, f64::NAN), None);
        assert_eq!(PointerMap::new(0.0, 10.0).to_grid(5.0, 5.0), None);
    }

    #[test]
    fn keys_target_neighbors_of_the_hole() {
        let grid = Grid::new(3).unwrap();
        assert_eq!(key_target(&grid, Move::Up), Some(Coord::new(2, 1)));
        assert_eq!(key_target(&grid, Move::Left), Some(Coord::new(1, 2)));
        assert_eq!(key_target(&grid, Move::Down), None);
    }
}
