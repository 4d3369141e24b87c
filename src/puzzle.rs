//! Grid model for the sliding-tile puzzle.
//!
//! The board is a flat, row-major vector of slots. Exactly one slot is empty;
//! every other slot holds a [`Tile`] that remembers its home coordinate. The
//! empty slot's coordinate is cached on the grid so neighbour lookups are O(1).

use std::fmt;

use crate::error::Error;

pub const MIN_DIM: usize = 2;

/// Largest board the terminal host can lay out sensibly.
pub const MAX_DIM: usize = 16;

/// A slot coordinate: `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Row-major linear index of this coordinate on a `dim × dim` board.
    #[inline]
    pub const fn index(self, dim: usize) -> usize {
        self.y * dim + self.x
    }

    #[inline]
    pub const fn from_index(index: usize, dim: usize) -> Self {
        Self {
            x: index % dim,
            y: index / dim,
        }
    }

    pub const fn in_bounds(self, dim: usize) -> bool {
        self.x < dim && self.y < dim
    }

    /// One step in `movement`'s direction, or `None` if that leaves the board.
    pub fn step(self, movement: Move, dim: usize) -> Option<Self> {
        let (dx, dy) = movement.offset();
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        let next = Self { x, y };
        next.in_bounds(dim).then_some(next)
    }

    pub fn is_orthogonally_adjacent(self, other: Self) -> bool {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) == 1
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Direction the empty slot travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Left,
    Down,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    pub fn offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (0, -1),
            Move::Left => (-1, 0),
            Move::Down => (0, 1),
            Move::Right => (1, 0),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Move::Up => "up",
            Move::Left => "left",
            Move::Down => "down",
            Move::Right => "right",
        })
    }
}

/// A movable piece, identified by the slot it belongs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    home: Coord,
}

impl Tile {
    pub fn home(&self) -> Coord {
        self.home
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    dim: usize,
    slots: Vec<Option<Tile>>,
    empty: Coord,
}

impl Grid {
    pub fn new(dim: usize) -> Result<Self, Error> {
        if !(MIN_DIM..=MAX_DIM).contains(&dim) {
            return Err(Error::InvalidDimension {
                dim,
                min: MIN_DIM,
                max: MAX_DIM,
            });
        }

        let mut grid = Self {
            dim,
            slots: Vec::with_capacity(dim * dim),
            empty: Coord::new(dim - 1, dim - 1),
        };
        grid.initialize();
        Ok(grid)
    }

    /// Resets to the solved arrangement with the empty slot bottom-right.
    pub fn initialize(&mut self) {
        let last = self.dim * self.dim - 1;
        self.slots.clear();
        self.slots.extend((0..=last).map(|index| {
            (index != last).then(|| Tile {
                home: Coord::from_index(index, self.dim),
            })
        }));
        self.empty = Coord::new(self.dim - 1, self.dim - 1);
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn empty_pos(&self) -> Coord {
        self.empty
    }

    pub fn slots(&self) -> &[Option<Tile>] {
        &self.slots
    }

    /// Exchanges the contents of two slots. No legality check: callers keep
    /// the cached empty position in step.
    pub(crate) fn swap(&mut self, a: Coord, b: Coord) {
        let ia = a.index(self.dim);
        let ib = b.index(self.dim);
        self.slots.swap(ia, ib);
    }

    /// Slides the empty slot onto `target` and records its new position.
    pub(crate) fn move_empty_to(&mut self, target: Coord) {
        self.swap(self.empty, target);
        self.empty = target;
    }

    /// In-bounds orthogonal neighbours of `coord`, paired with the direction
    /// that reaches each one.
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = (Move, Coord)> + '_ {
        Move::ALL
            .into_iter()
            .filter_map(move |dir| coord.step(dir, self.dim).map(|next| (dir, next)))
    }

    /// Moves the empty slot one step in `movement`'s direction. Returns false
    /// and leaves the board untouched when that would leave the grid.
    pub fn apply_move(&mut self, movement: Move) -> bool {
        match self.empty.step(movement, self.dim) {
            Some(target) => {
                self.move_empty_to(target);
                true
            }
            None => false,
        }
    }

    pub fn is_solved(&self) -> bool {
        self.slots.iter().enumerate().all(|(index, slot)| match slot {
            Some(tile) => tile.home.index(self.dim) == index,
            None => true,
        })
    }

    /// Inversion-parity test: whether this arrangement can reach the solved
    /// one through legal moves.
    pub fn is_solvable(&self) -> bool {
        let inversions = self.count_inversions();

        if self.dim % 2 == 1 {
            inversions % 2 == 0
        } else {
            (inversions + self.empty.y) % 2 == 1
        }
    }

    fn count_inversions(&self) -> usize {
        let homes: Vec<usize> = self
            .slots
            .iter()
            .flatten()
            .map(|tile| tile.home.index(self.dim))
            .collect();

        homes
            .iter()
            .enumerate()
            .map(|(i, &val)| homes[i + 1..].iter().filter(|&&next| next < val).count())
            .sum()
    }

    /// Checks the structural invariants: one empty slot, at the cached
    /// position, and every home coordinate present exactly once.
    pub fn is_consistent(&self) -> bool {
        let cells = self.dim * self.dim;
        if self.slots.len() != cells || !self.empty.in_bounds(self.dim) {
            return false;
        }
        if self.slots[self.empty.index(self.dim)].is_some() {
            return false;
        }

        let mut seen = vec![false; cells];
        let mut empties = 0;
        for slot in &self.slots {
            match slot {
                None => empties += 1,
                Some(tile) => {
                    if !tile.home.in_bounds(self.dim) {
                        return false;
                    }
                    let home = tile.home.index(self.dim);
                    if seen[home] {
                        return false;
                    }
                    seen[home] = true;
                }
            }
        }
        empties == 1
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.slots.chunks(self.dim) {
            for slot in row {
                match slot {
                    Some(tile) => write!(f, "{:2} ", tile.home.index(self.dim) + 1)?,
                    None => write!(f, "{:>2} ", '.')?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
