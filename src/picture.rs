//! The source picture tiles are cut from.
//!
//! The terminal host has no image decoder, so a picture is a raster of
//! characters. Any raster at least one cell per tile on each axis works.

use std::fs;
use std::path::Path;

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl Picture {
    /// Builds a picture from text art. Short lines are padded with spaces.
    pub fn from_text(text: &str) -> Result<Self, Error> {
        let lines: Vec<Vec<char>> = text
            .lines()
            .map(|line| line.trim_end().chars().collect())
            .collect();
        let width = lines.iter().map(Vec::len).max().unwrap_or(0);
        let height = lines.len();
        if width == 0 || height == 0 {
            return Err(Error::EmptyPicture);
        }

        let mut cells = Vec::with_capacity(width * height);
        for mut line in lines {
            line.resize(width, ' ');
            cells.extend(line);
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let text = fs::read_to_string(path)?;
        Self::from_text(&text)
    }

    /// Built-in scene: a house on a hill under a sky, scaled to `width × height`.
    pub fn pattern(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mut cells = Vec::with_capacity(width * height);

        let horizon = height * 3 / 4;
        let house_left = width / 4;
        let house_right = width * 3 / 4;
        let roof_top = height / 4;
        let wall_top = height / 2;
        let center = width / 2;
        let sun = (width * 5 / 6, height / 8);

        for y in 0..height {
            for x in 0..width {
                let roof_half = (y.saturating_sub(roof_top) * (house_right - house_left)) / 2
                    / (wall_top - roof_top).max(1);
                let glyph = if y >= horizon {
                    if (x + y) % 3 == 0 {
                        ','
                    } else {
                        '"'
                    }
                } else if y >= wall_top && x >= house_left && x < house_right {
                    let door = x.abs_diff(center) <= width / 16 && y > (wall_top + horizon) / 2;
                    if door {
                        '|'
                    } else if x == house_left || x + 1 == house_right {
                        '#'
                    } else {
                        '='
                    }
                } else if y >= roof_top && y < wall_top && x.abs_diff(center) <= roof_half {
                    '^'
                } else if x.abs_diff(sun.0) + y.abs_diff(sun.1) <= height / 10 + 1 {
                    'O'
                } else if (x * 7 + y * 13) % 29 == 0 {
                    '.'
                } else {
                    ' '
                };
                cells.push(glyph);
            }
        }

        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<char> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    pub fn check_tileable(&self, dim: usize) -> Result<(), Error> {
        if self.width < dim || self.height < dim {
            return Err(Error::PictureTooSmall {
                width: self.width,
                height: self.height,
                dim,
            });
        }
        Ok(())
    }
}
