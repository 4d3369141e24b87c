//! One puzzle session: the board, the move rules, and change notification.
//!
//! Input adapters hand a target coordinate to [`Session::attempt_move`]. A
//! target is legal only when it sits exactly one orthogonal step from the
//! empty slot; anything else is dropped without touching the board. Legal
//! moves notify subscribers with [`Event::StateChanged`], followed by
//! [`Event::Solved`] when the move completes the picture.

use std::fmt;

use rand::rngs::StdRng;
use rand::{thread_rng, Rng, SeedableRng};
use tracing::{debug, info, trace};

use crate::config::PuzzleConfig;
use crate::error::Error;
use crate::input::key_target;
use crate::puzzle::{Coord, Grid, Move};
use crate::shuffle::shuffle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Built but not yet shuffled; moves are ignored.
    Uninitialized,
    Shuffled,
    /// Every tile is home. Further moves are still accepted.
    Solved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    StateChanged,
    Solved,
}

/// Why a move attempt was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NotStarted,
    /// A previous move or transition still holds the latch.
    Busy,
    OutOfBounds,
    NotAdjacent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved { solved: bool },
    Ignored(Rejection),
}

impl MoveOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }
}

type Listener = Box<dyn FnMut(&Event, &Grid)>;

pub struct Session {
    config: PuzzleConfig,
    grid: Grid,
    phase: Phase,
    animating: bool,
    moves: usize,
    rounds: u64,
    listeners: Vec<Listener>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("grid", &self.grid)
            .field("phase", &self.phase)
            .field("animating", &self.animating)
            .field("moves", &self.moves)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(config: PuzzleConfig) -> Result<Self, Error> {
        config.validate()?;
        let grid = Grid::new(config.dim)?;
        Ok(Self {
            config,
            grid,
            phase: Phase::Uninitialized,
            animating: false,
            moves: 0,
            rounds: 0,
            listeners: Vec::new(),
        })
    }

    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_solved(&self) -> bool {
        self.grid.is_solved()
    }

    /// Legal moves made since the last start.
    pub fn move_count(&self) -> usize {
        self.moves
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Takes the latch for a transition layered over a move. Returns false
    /// when it is already held.
    pub fn begin_transition(&mut self) -> bool {
        if self.animating {
            return false;
        }
        self.animating = true;
        true
    }

    pub fn end_transition(&mut self) {
        self.animating = false;
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&Event, &Grid) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Starts a round using the configured seed, or OS entropy when unseeded.
    /// Each round of a seeded session gets its own derived seed.
    pub fn start(&mut self) {
        match self.config.seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(self.rounds));
                self.start_with(&mut rng);
            }
            None => self.start_with(&mut thread_rng()),
        }
    }

    pub fn start_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.grid.initialize();
        let history = shuffle(&mut self.grid, self.config.shuffle_moves, rng);
        self.phase = if self.grid.is_solved() {
            Phase::Solved
        } else {
            Phase::Shuffled
        };
        self.moves = 0;
        self.animating = false;
        self.rounds = self.rounds.wrapping_add(1);

        info!(
            dim = self.config.dim,
            shuffle_moves = history.len(),
            round = self.rounds,
            "puzzle started"
        );
    }

    /// Moves the tile at `target` into the empty slot if it is orthogonally
    /// adjacent to it. Anything else leaves the board untouched.
    pub fn attempt_move(&mut self, target: Coord) -> MoveOutcome {
        if let Some(rejection) = self.check(target) {
            trace!(%target, ?rejection, "move ignored");
            return MoveOutcome::Ignored(rejection);
        }

        self.animating = true;
        let from = self.grid.empty_pos();
        self.grid.move_empty_to(target);
        self.moves += 1;

        let solved = self.grid.is_solved();
        self.phase = if solved { Phase::Solved } else { Phase::Shuffled };
        debug!(%from, %target, moves = self.moves, solved, "tile moved");

        self.emit(Event::StateChanged);
        if solved {
            info!(moves = self.moves, "puzzle solved");
            self.emit(Event::Solved);
        }
        self.animating = false;

        MoveOutcome::Moved { solved }
    }

    /// Slides the tile lying in `direction` from the empty slot into it.
    pub fn slide(&mut self, direction: Move) -> MoveOutcome {
        match key_target(&self.grid, direction) {
            Some(target) => self.attempt_move(target),
            None => MoveOutcome::Ignored(Rejection::OutOfBounds),
        }
    }

    fn check(&self, target: Coord) -> Option<Rejection> {
        if self.phase == Phase::Uninitialized {
            Some(Rejection::NotStarted)
        } else if self.animating {
            Some(Rejection::Busy)
        } else if !target.in_bounds(self.grid.dim()) {
            Some(Rejection::OutOfBounds)
        } else if !self.grid.empty_pos().is_orthogonally_adjacent(target) {
            Some(Rejection::NotAdjacent)
        } else {
            None
        }
    }

    fn emit(&mut self, event: Event) {
        for listener in &mut self.listeners {
            listener(&event, &self.grid);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn solved_session(dim: usize) -> Session {
        let mut session =
            Session::new(PuzzleConfig::default().with_dim(dim).with_shuffle_moves(0)).unwrap();
        session.start();
        session
    }

    fn recorder(session: &mut Session) -> Rc<RefCell<Vec<Event>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        session.subscribe(move |event, _| sink.borrow_mut().push(*event));
        events
    }

    #[test]
    fn ignores_moves_before_start() {
        let mut session = Session::new(PuzzleConfig::default()).unwrap();
        assert_eq!(session.phase(), Phase::Uninitialized);
        assert_eq!(
            session.attempt_move(Coord::new(1, 2)),
            MoveOutcome::Ignored(Rejection::NotStarted)
        );
        assert!(session.grid().is_solved());
    }

    #[test]
    fn adjacent_move_and_back_solves() {
        let mut session = solved_session(3);
        let events = recorder(&mut session);
        assert_eq!(session.phase(), Phase::Solved);

        let outcome = session.attempt_move(Coord::new(1, 2));
        assert_eq!(outcome, MoveOutcome::Moved { solved: false });
        assert_eq!(session.grid().empty_pos(), Coord::new(1, 2));
        let moved = session.grid().slots()[Coord::new(2, 2).index(3)];
        assert_eq!(moved.map(|tile| tile.home()), Some(Coord::new(1, 2)));
        assert_eq!(session.phase(), Phase::Shuffled);
        assert!(!session.is_solved());

        let outcome = session.attempt_move(Coord::new(2, 2));
        assert_eq!(outcome, MoveOutcome::Moved { solved: true });
        assert!(session.is_solved());
        assert_eq!(session.phase(), Phase::Solved);
        assert_eq!(session.move_count(), 2);

        assert_eq!(
            *events.borrow(),
            vec![Event::StateChanged, Event::StateChanged, Event::Solved]
        );
    }

    #[test]
    fn far_and_diagonal_targets_are_ignored() {
        let mut session = solved_session(3);
        let events = recorder(&mut session);
        let before = session.grid().clone();

        assert_eq!(
            session.attempt_move(Coord::new(0, 0)),
            MoveOutcome::Ignored(Rejection::NotAdjacent)
        );
        assert_eq!(
            session.attempt_move(Coord::new(1, 1)),
            MoveOutcome::Ignored(Rejection::NotAdjacent)
        );
        assert_eq!(
            session.attempt_move(Coord::new(2, 2)),
            MoveOutcome::Ignored(Rejection::NotAdjacent)
        );
        assert_eq!(
            session.attempt_move(Coord::new(3, 2)),
            MoveOutcome::Ignored(Rejection::OutOfBounds)
        );

        assert_eq!(session.grid(), &before);
        assert_eq!(session.move_count(), 0);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn latch_blocks_moves_until_released() {
        let mut session = solved_session(3);
        assert!(session.begin_transition());
        assert!(!session.begin_transition());
        assert_eq!(
            session.attempt_move(Coord::new(1, 2)),
            MoveOutcome::Ignored(Rejection::Busy)
        );
        assert_eq!(session.grid().empty_pos(), Coord::new(2, 2));

        session.end_transition();
        assert!(session.attempt_move(Coord::new(1, 2)).is_moved());
        assert!(!session.is_animating());
    }

    #[test]
    fn slide_moves_empty_in_direction() {
        let mut session = solved_session(3);
        assert_eq!(
            session.slide(Move::Right),
            MoveOutcome::Ignored(Rejection::OutOfBounds)
        );
        assert!(session.slide(Move::Up).is_moved());
        assert_eq!(session.grid().empty_pos(), Coord::new(2, 1));
    }

    #[test]
    fn listener_sees_board_after_move() {
        let mut session = solved_session(3);
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        session.subscribe(move |_, grid| *sink.borrow_mut() = Some(grid.empty_pos()));
        session.attempt_move(Coord::new(2, 1));
        assert_eq!(*seen.borrow(), Some(Coord::new(2, 1)));
    }

    #[test]
    fn seeded_rounds_differ_but_reproduce() {
        let config = PuzzleConfig::default().with_seed(Some(5));
        let mut a = Session::new(config.clone()).unwrap();
        let mut b = Session::new(config).unwrap();
        a.start();
        b.start();
        assert_eq!(a.grid(), b.grid());
        assert!(a.grid().is_solvable());

        a.start();
        b.start();
        assert_eq!(a.grid(), b.grid());
        assert_eq!(a.move_count(), 0);
    }
}
