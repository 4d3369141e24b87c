//! Crossterm host: paints the board into a frame buffer, flushes it to the
//! terminal, and feeds mouse clicks and arrow keys to the session.

use std::cell::Cell;
use std::io::{self, Write};
use std::rc::Rc;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event as TermEvent, KeyCode, KeyEvent,
    KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use tracing::{debug, warn};

use tile_puzzle::input::PointerMap;
use tile_puzzle::picture::Picture;
use tile_puzzle::render::{paint, Blit, Region, Surface};
use tile_puzzle::{Event, Move, Session};

/// Top-left corner of the board, leaving room for the title line.
const ORIGIN: (u16, u16) = (2, 2);

/// Largest tile side, in terminal cells, the CLI accepts.
pub const MAX_TILE_CELLS: u16 = 64;

/// Screen row `offset` lines below the origin. Crossterm adds one to the
/// row when encoding `MoveTo`, so `u16::MAX` itself is out of reach.
fn screen_row(offset: usize) -> io::Result<u16> {
    u16::try_from(offset)
        .ok()
        .and_then(|offset| ORIGIN.1.checked_add(offset))
        .filter(|row| *row < u16::MAX)
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("board row {} does not fit on a terminal", offset),
            )
        })
}

#[derive(Clone, Copy, PartialEq, Eq)]
struct FrameCell {
    glyph: char,
    border: bool,
}

/// Character frame buffer the board is painted into before flushing.
struct Frame<'a> {
    picture: &'a Picture,
    width: usize,
    height: usize,
    cells: Vec<FrameCell>,
}

impl<'a> Frame<'a> {
    fn new(picture: &'a Picture, width: usize, height: usize) -> Self {
        Self {
            picture,
            width,
            height,
            cells: vec![
                FrameCell {
                    glyph: ' ',
                    border: false,
                };
                width * height
            ],
        }
    }

    fn put(&mut self, x: usize, y: usize, glyph: char, border: bool) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = FrameCell { glyph, border };
        }
    }

    fn present<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (row_index, row) in self.cells.chunks(self.width).enumerate() {
            queue!(out, MoveTo(ORIGIN.0, screen_row(row_index)?))?;
            for cell in row {
                if cell.border {
                    queue!(
                        out,
                        SetForegroundColor(Color::DarkGrey),
                        Print(cell.glyph),
                        ResetColor
                    )?;
                } else {
                    queue!(out, Print(cell.glyph))?;
                }
            }
        }
        Ok(())
    }
}

impl Surface for Frame<'_> {
    fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = FrameCell {
                glyph: ' ',
                border: false,
            };
        }
    }

    fn blit(&mut self, blit: &Blit) {
        let Blit { source, dest } = *blit;
        if dest.width == 0 || dest.height == 0 {
            return;
        }
        for dy in 0..dest.height {
            for dx in 0..dest.width {
                let sx = source.x + dx * source.width / dest.width;
                let sy = source.y + dy * source.height / dest.height;
                let glyph = self.picture.get(sx, sy).unwrap_or(' ');
                self.put(dest.x + dx, dest.y + dy, glyph, false);
            }
        }
    }

    fn outline(&mut self, dest: &Region) {
        if dest.width < 2 || dest.height < 2 {
            return;
        }
        let right = dest.x + dest.width - 1;
        let bottom = dest.y + dest.height - 1;
        for x in dest.x..=right {
            let glyph = if x == dest.x || x == right { '+' } else { '-' };
            self.put(x, dest.y, glyph, true);
            self.put(x, bottom, glyph, true);
        }
        for y in dest.y + 1..bottom {
            self.put(dest.x, y, '|', true);
            self.put(right, y, '|', true);
        }
    }
}

/// Restores the terminal even when the loop bails out early.
struct TerminalGuard;

impl TerminalGuard {
    fn enter<W: Write>(out: &mut W) -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, EnableMouseCapture, Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = io::stdout();
        if let Err(e) = execute!(out, Show, DisableMouseCapture, LeaveAlternateScreen) {
            warn!(error = %e, "failed to restore terminal screen");
        }
        if let Err(e) = disable_raw_mode() {
            warn!(error = %e, "failed to leave raw mode");
        }
    }
}

enum Action {
    Target(u16, u16),
    Slide(Move),
    Restart,
    Redraw,
    Quit,
    Nothing,
}

fn classify(event: TermEvent) -> Action {
    match event {
        TermEvent::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            ..
        }) => Action::Target(column, row),
        TermEvent::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) => match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('r') => Action::Restart,
            // Arrows push the tile in that direction, so the hole goes the other way.
            KeyCode::Up | KeyCode::Char('w') => Action::Slide(Move::Down),
            KeyCode::Down | KeyCode::Char('s') => Action::Slide(Move::Up),
            KeyCode::Left | KeyCode::Char('a') => Action::Slide(Move::Right),
            KeyCode::Right | KeyCode::Char('d') => Action::Slide(Move::Left),
            _ => Action::Nothing,
        },
        TermEvent::Resize(..) => Action::Redraw,
        _ => Action::Nothing,
    }
}

/// Runs the interactive loop until the player quits.
pub fn run(session: &mut Session, picture: &Picture, tile: (usize, usize)) -> io::Result<()> {
    let dim = session.grid().dim();
    let surface = (dim * tile.0, dim * tile.1);
    let pointer = PointerMap::new(tile.0 as f64, tile.1 as f64);

    let solved = Rc::new(Cell::new(session.is_solved()));
    let dirty = Rc::new(Cell::new(true));
    {
        let solved = Rc::clone(&solved);
        let dirty = Rc::clone(&dirty);
        session.subscribe(move |event, _| match event {
            Event::StateChanged => {
                dirty.set(true);
                solved.set(false);
            }
            Event::Solved => solved.set(true),
        });
    }

    let mut out = io::stdout();
    let _guard = TerminalGuard::enter(&mut out)?;
    let mut frame = Frame::new(picture, surface.0, surface.1);

    loop {
        if dirty.replace(false) {
            paint(session.grid(), picture.size(), surface, &mut frame);
            draw(&mut out, &frame, session, solved.get())?;
        }

        match classify(event::read()?) {
            Action::Quit => break,
            Action::Restart => {
                session.start();
                solved.set(session.is_solved());
                dirty.set(true);
            }
            Action::Redraw => dirty.set(true),
            Action::Slide(direction) => {
                debug!(hole = %direction, "slide key");
                session.slide(direction);
            }
            Action::Target(column, row) => {
                let local_x = f64::from(column) - f64::from(ORIGIN.0);
                let local_y = f64::from(row) - f64::from(ORIGIN.1);
                match pointer.to_grid(local_x, local_y) {
                    Some(target) => {
                        session.attempt_move(target);
                    }
                    None => debug!(column, row, "click outside the board"),
                }
            }
            Action::Nothing => {}
        }
    }

    Ok(())
}

fn draw<W: Write>(
    out: &mut W,
    frame: &Frame<'_>,
    session: &Session,
    solved: bool,
) -> io::Result<()> {
    queue!(
        out,
        Clear(ClearType::All),
        MoveTo(ORIGIN.0, 0),
        Print(format!(
            "Tile Puzzle {0}x{0}   moves: {1}",
            session.grid().dim(),
            session.move_count()
        ))
    )?;
    frame.present(out)?;

    queue!(out, MoveTo(ORIGIN.0, screen_row(frame.height + 1)?))?;
    if solved {
        queue!(
            out,
            SetForegroundColor(Color::Green),
            Print("Puzzle solved! "),
            ResetColor
        )?;
    }
    queue!(out, Print("click/arrows: slide   r: new puzzle   q: quit"))?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_puzzle::Grid;

    fn rows(frame: &Frame<'_>) -> Vec<String> {
        frame
            .cells
            .chunks(frame.width)
            .map(|row| row.iter().map(|cell| cell.glyph).collect())
            .collect()
    }

    #[test]
    fn frame_draws_outlined_tiles_and_a_hole() {
        let picture = Picture::pattern(6, 6);
        let grid = Grid::new(2).unwrap();
        let mut frame = Frame::new(&picture, 6, 6);
        paint(&grid, picture.size(), (6, 6), &mut frame);

        let rows = rows(&frame);
        assert_eq!(rows[0], "+-++-+");
        assert_eq!(rows[3], "+-+   ");
        assert_eq!(rows[5], "+-+   ");
    }

    #[test]
    fn arrow_keys_push_tiles() {
        let key = |code| TermEvent::Key(KeyEvent::new(code, KeyModifiers::NONE));
        assert!(matches!(classify(key(KeyCode::Up)), Action::Slide(Move::Down)));
        assert!(matches!(classify(key(KeyCode::Char('a'))), Action::Slide(Move::Right)));
        assert!(matches!(classify(key(KeyCode::Esc)), Action::Quit));
        assert!(matches!(
            classify(TermEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))),
            Action::Quit
        ));
    }

    #[test]
    fn key_release_does_not_slide_again() {
        let release = KeyEvent::new_with_kind(
            KeyCode::Up,
            KeyModifiers::NONE,
            KeyEventKind::Release,
        );
        assert!(matches!(classify(TermEvent::Key(release)), Action::Nothing));

        let repeat = KeyEvent::new_with_kind(
            KeyCode::Left,
            KeyModifiers::NONE,
            KeyEventKind::Repeat,
        );
        assert!(matches!(classify(TermEvent::Key(repeat)), Action::Nothing));
    }

    #[test]
    fn oversized_frame_is_an_error_not_a_panic() {
        let picture = Picture::pattern(3, 3);
        let frame = Frame::new(&picture, 3, usize::from(u16::MAX));
        let err = frame.present(&mut Vec::new()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn largest_accepted_board_fits_on_screen() {
        let rows = 16 * usize::from(MAX_TILE_CELLS);
        assert!(screen_row(rows + 1).is_ok());
        assert!(screen_row(usize::from(u16::MAX)).is_err());
        assert!(screen_row(usize::from(u16::MAX - ORIGIN.1 - 1)).is_ok());
        assert!(screen_row(usize::from(u16::MAX - ORIGIN.1)).is_err());
        assert_eq!(screen_row(0).unwrap(), ORIGIN.1);
    }
}
