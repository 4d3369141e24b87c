//! Render adapter contract.
//!
//! The engine only says which part of the picture goes where. A host
//! implements [`Surface`] and gets a full repaint on every change.

use crate::puzzle::{Coord, Grid};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Region {
    fn cell(coord: Coord, width: usize, height: usize) -> Self {
        Self {
            x: coord.x * width,
            y: coord.y * height,
            width,
            height,
        }
    }
}

/// Copy `source` from the picture into `dest` on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blit {
    pub source: Region,
    pub dest: Region,
}

pub trait Surface {
    fn clear(&mut self);
    fn blit(&mut self, blit: &Blit);
    /// Draws the border around one tile.
    fn outline(&mut self, dest: &Region);
}

/// One blit per tile: the tile's home region of the picture drawn at its
/// current slot. The empty slot produces nothing.
pub fn layout(
    grid: &Grid,
    picture_size: (usize, usize),
    surface_size: (usize, usize),
) -> Vec<Blit> {
    let dim = grid.dim();
    let (src_w, src_h) = (picture_size.0 / dim, picture_size.1 / dim);
    let (dst_w, dst_h) = (surface_size.0 / dim, surface_size.1 / dim);

    grid.slots()
        .iter()
        .enumerate()
        .filter_map(|(index, slot)| {
            slot.map(|tile| Blit {
                source: Region::cell(tile.home(), src_w, src_h),
                dest: Region::cell(Coord::from_index(index, dim), dst_w, dst_h),
            })
        })
        .collect()
}

pub fn paint<S: Surface + ?Sized>(
    grid: &Grid,
    picture_size: (usize, usize),
    surface_size: (usize, usize),
    surface: &mut S,
) {
    surface.clear();
    for blit in layout(grid, picture_size, surface_size) {
        surface.blit(&blit);
        surface.outline(&blit.dest);
    }
}
