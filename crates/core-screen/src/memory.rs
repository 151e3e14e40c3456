//! In-memory screen used by tests and fixtures.

use crate::grid::Grid;
use crate::{Cell, Screen, Style};
use anyhow::Result;

/// A `Screen` with no terminal attached. `commit` only counts; the grid and
/// the recorded cursor position can be inspected directly.
#[derive(Debug)]
pub struct MemoryScreen {
    grid: Grid,
    cursor: Option<(usize, usize)>,
    pub commits: usize,
}

impl MemoryScreen {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid: Grid::new(width, height),
            cursor: None,
            commits: 0,
        }
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.grid.get(x, y)
    }

    /// Concatenated glyphs of one row (shadow cells of wide glyphs included
    /// as the blanks they hold).
    pub fn row_text(&self, y: usize) -> String {
        self.grid.row(y).iter().map(|c| c.ch).collect()
    }

    pub fn cursor(&self) -> Option<(usize, usize)> {
        self.cursor
    }
}

impl Screen for MemoryScreen {
    fn size(&self) -> (usize, usize) {
        (self.grid.width, self.grid.height)
    }

    fn set_cell(&mut self, x: usize, y: usize, ch: char, style: Style) {
        self.grid.set(x, y, ch, style);
    }

    fn show_cursor_at(&mut self, x: usize, y: usize) {
        self.cursor = Some((x, y));
    }

    fn clear(&mut self) {
        self.grid.clear();
    }

    fn resize(&mut self, width: usize, height: usize) {
        self.grid.resize(width, height);
        self.cursor = None;
    }

    fn commit(&mut self) -> Result<()> {
        self.commits += 1;
        Ok(())
    }
}
