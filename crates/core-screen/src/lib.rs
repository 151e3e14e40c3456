//! Terminal cell-grid abstraction.
//!
//! The renderer and the input line never talk to the terminal directly; they
//! write into a `Screen`, an owned grid of styled cells with a deferred
//! `commit`. Two implementations are provided:
//!
//! * [`CrosstermScreen`] — the real backend. Owns raw mode + alternate screen
//!   (restored on drop) and repaints the grid through queued crossterm
//!   commands on `commit`.
//! * [`MemoryScreen`] — an in-memory grid with no terminal attached, used by
//!   unit and integration tests to assert on exact cell contents.
//!
//! Invariants:
//! * Coordinates are 0-based, origin top-left.
//! * `set_cell` outside the grid is a no-op, never an error.
//! * Nothing is visible to the user until `commit` runs; a redraw pass is a
//!   sequence of `set_cell` calls followed by exactly one `commit`.

use anyhow::Result;

pub mod crossterm_screen;
mod grid;
pub mod memory;
mod style;

pub use crossterm_screen::CrosstermScreen;
pub use memory::MemoryScreen;
pub use style::{Color, Style};

/// One grid cell. A double-width glyph occupies its own cell plus a blank
/// shadow cell at `x + 1`; the commit path skips the shadow column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: Style::default(),
        }
    }
}

/// Cell-grid output sink shared by every renderer in the workspace.
pub trait Screen {
    /// Current grid size in columns and rows.
    fn size(&self) -> (usize, usize);

    /// Write one glyph. Out-of-range coordinates are ignored.
    fn set_cell(&mut self, x: usize, y: usize, ch: char, style: Style);

    /// Record where the hardware cursor indicator should be shown after the
    /// next `commit`.
    fn show_cursor_at(&mut self, x: usize, y: usize);

    /// Reset every cell to a default-styled space.
    fn clear(&mut self);

    /// Reallocate the grid for a new terminal size. Content is discarded;
    /// callers are expected to follow up with a full redraw.
    fn resize(&mut self, width: usize, height: usize);

    /// Make all pending cell writes visible atomically (one flush).
    fn commit(&mut self) -> Result<()>;
}
