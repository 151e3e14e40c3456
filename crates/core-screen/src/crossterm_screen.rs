//! Crossterm-backed screen: raw mode + alternate screen lifecycle and the
//! queued full-repaint commit path.
//!
//! Repaint strategy: the grid is authoritative, so `commit` replays every row
//! as consecutive same-style runs (one attribute change + one print per run)
//! and flushes once. Runs keep the command count far below one-per-cell
//! without any diffing state to invalidate.

use crate::grid::{Grid, style_runs};
use crate::{Screen, Style};
use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal::{
        self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    },
};
use std::io::{Write, stdout};

pub struct CrosstermScreen {
    grid: Grid,
    cursor: Option<(usize, usize)>,
    entered: bool,
}

impl CrosstermScreen {
    /// Enter raw mode + alternate screen and size the grid from the terminal.
    /// The terminal is restored when the screen is dropped.
    pub fn new() -> Result<Self> {
        let (w, h) = terminal::size().context("query terminal size")?;
        enable_raw_mode().context("enable raw mode")?;
        queue!(stdout(), EnterAlternateScreen, Hide)?;
        stdout().flush()?;
        tracing::info!(target: "render.screen", width = w, height = h, "screen_init");
        Ok(Self {
            grid: Grid::new(w as usize, h as usize),
            cursor: None,
            entered: true,
        })
    }

    fn leave(&mut self) -> Result<()> {
        if self.entered {
            queue!(stdout(), LeaveAlternateScreen, Show)?;
            stdout().flush()?;
            disable_raw_mode()?;
            self.entered = false;
        }
        Ok(())
    }
}

impl Drop for CrosstermScreen {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

fn queue_style(out: &mut impl Write, style: Style) -> Result<()> {
    queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
    if style.bold {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if style.dim {
        queue!(out, SetAttribute(Attribute::Dim))?;
    }
    if style.italic {
        queue!(out, SetAttribute(Attribute::Italic))?;
    }
    if style.underline {
        queue!(out, SetAttribute(Attribute::Underlined))?;
    }
    queue!(out, SetForegroundColor(style.fg.unwrap_or(Color::Reset)))?;
    queue!(out, SetBackgroundColor(style.bg.unwrap_or(Color::Reset)))?;
    Ok(())
}

impl Screen for CrosstermScreen {
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
        let mut out = stdout();
        queue!(out, Hide)?;
        for y in 0..self.grid.height {
            queue!(out, MoveTo(0, y as u16))?;
            for (style, text) in style_runs(self.grid.row(y)) {
                queue_style(&mut out, style)?;
                queue!(out, Print(text))?;
            }
        }
        queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
        if let Some((x, y)) = self.cursor {
            queue!(out, MoveTo(x as u16, y as u16), Show)?;
        }
        out.flush().context("flush terminal")?;
        Ok(())
    }
}
