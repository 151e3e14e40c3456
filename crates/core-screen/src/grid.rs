//! Row-major cell storage shared by the screen implementations.

use crate::{Cell, Style};
use unicode_width::UnicodeWidthChar;

#[derive(Debug, Clone)]
pub(crate) struct Grid {
    pub width: usize,
    pub height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width * height],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Write a glyph. A double-width glyph blanks its shadow cell so stale
    /// content never peeks out from under it.
    pub fn set(&mut self, x: usize, y: usize, ch: char, style: Style) {
        if x >= self.width || y >= self.height {
            return;
        }
        self.cells[y * self.width + x] = Cell { ch, style };
        if UnicodeWidthChar::width(ch).unwrap_or(0) == 2 && x + 1 < self.width {
            self.cells[y * self.width + x + 1] = Cell { ch: ' ', style };
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells.resize(width * height, Cell::default());
    }

    pub fn row(&self, y: usize) -> &[Cell] {
        let start = y * self.width;
        &self.cells[start..start + self.width]
    }
}

/// Group a row of cells into consecutive same-style runs so the terminal
/// backend can emit one attribute change plus one print per run instead of
/// per cell. The shadow column after a double-width glyph is folded into the
/// run of its leading cell.
pub(crate) fn style_runs(row: &[Cell]) -> Vec<(Style, String)> {
    let mut runs: Vec<(Style, String)> = Vec::new();
    let mut skip_shadow = false;
    for cell in row {
        if skip_shadow {
            skip_shadow = false;
            continue;
        }
        if UnicodeWidthChar::width(cell.ch).unwrap_or(0) == 2 {
            skip_shadow = true;
        }
        match runs.last_mut() {
            Some((style, text)) if *style == cell.style => text.push(cell.ch),
            _ => runs.push((cell.style, cell.ch.to_string())),
        }
    }
    runs
}
