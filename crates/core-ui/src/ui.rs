//! The UI facade: one owner for the screen, the buffer list, the scroll
//! state, and the input editor.
//!
//! Screen layout, top to bottom:
//! * rows `0..h-3` — scrollback for the selected buffer;
//! * row `h-3` — typing indicator;
//! * row `h-2` — input line (the hardware cursor lives here);
//! * row `h-1` — buffer status bar.
//!
//! Every public operation that changes visible state ends in exactly one
//! `commit`. All methods run on the single owner thread; nothing here locks.

use crate::editor::Editor;
use crate::scrollback::draw_scrollback;
use crate::status::draw_status;
use crate::typing::draw_typing;
use anyhow::Result;
use core_chat::{BufferList, Line};
use core_screen::Screen;

pub struct Ui<S: Screen> {
    screen: S,
    buffers: BufferList,
    editor: Editor,
    scroll_amt: usize,
    /// Whether the last scrollback draw had the oldest line's top visible.
    at_top: bool,
}

impl<S: Screen> Ui<S> {
    /// Build the UI around an already-initialized screen and paint the first
    /// frame.
    pub fn new(screen: S, greeting: impl Into<String>, limit: Option<usize>) -> Result<Self> {
        let width = screen.size().0;
        let mut ui = Self {
            screen,
            buffers: BufferList::new(greeting, limit),
            editor: Editor::new(width),
            scroll_amt: 0,
            at_top: true,
        };
        ui.draw()?;
        Ok(ui)
    }

    /// Full repaint: scrollback, typing row, input line, status bar, cursor.
    pub fn draw(&mut self) -> Result<()> {
        let (_, height) = self.screen.size();
        if height < 4 {
            return self.screen.commit();
        }
        self.at_top = draw_scrollback(
            &mut self.screen,
            self.buffers.current_buffer_mut(),
            self.scroll_amt,
        );
        draw_typing(&mut self.screen, &self.buffers.current_buffer().typings);
        let (cursor_x, _) = self.editor.draw(&mut self.screen, height - 2);
        draw_status(&mut self.screen, &self.buffers);
        self.screen.show_cursor_at(cursor_x, height - 2);
        self.screen.commit()
    }

    fn scroll_step(&self) -> usize {
        let (_, height) = self.screen.size();
        height / 2
    }

    /// Scroll half the screen height toward older lines. No-op once the top
    /// is visible.
    pub fn scroll_up(&mut self) -> Result<()> {
        if self.at_top {
            return Ok(());
        }
        self.scroll_amt += self.scroll_step();
        self.draw()
    }

    /// Scroll half the screen height toward newer lines, saturating at the
    /// live bottom.
    pub fn scroll_down(&mut self) -> Result<()> {
        if self.scroll_amt == 0 {
            return Ok(());
        }
        self.scroll_amt = self.scroll_amt.saturating_sub(self.scroll_step());
        self.draw()
    }

    /// Whether the oldest retained line is currently visible. Callers poll
    /// this after scrolling to decide when to fetch older history.
    pub fn is_at_top(&self) -> bool {
        self.at_top
    }

    pub fn current_buffer_idx(&self) -> usize {
        self.buffers.current
    }

    pub fn current_buffer_title(&self) -> &str {
        &self.buffers.current_buffer().title
    }

    pub fn buffer_idx(&self, title: &str) -> Option<usize> {
        self.buffers.idx(title)
    }

    pub fn next_buffer(&mut self) -> Result<()> {
        if self.buffers.next() {
            self.scroll_amt = 0;
            self.draw()?;
        }
        Ok(())
    }

    pub fn previous_buffer(&mut self) -> Result<()> {
        if self.buffers.previous() {
            self.scroll_amt = 0;
            self.draw()?;
        }
        Ok(())
    }

    /// Create (or find) a buffer and select it.
    pub fn add_buffer(&mut self, title: &str) -> Result<usize> {
        let (idx, created) = self.buffers.add(title);
        self.buffers.current = idx;
        self.buffers.list[idx].highlights = 0;
        self.scroll_amt = 0;
        if created {
            tracing::info!(target: "ui", title, "buffer_opened");
        }
        self.draw()?;
        Ok(idx)
    }

    /// Close a buffer by title. The home buffer cannot be closed.
    pub fn remove_buffer(&mut self, title: &str) -> Result<bool> {
        let removed = self.buffers.remove(title);
        if removed {
            self.scroll_amt = 0;
            self.draw()?;
        }
        Ok(removed)
    }

    /// Append a line to a buffer. When the target is the selected buffer and
    /// the view is scrolled up, the scroll anchor grows by the new line's
    /// height so the visible content does not shift.
    pub fn add_line(&mut self, idx: usize, mut line: Line, highlight: bool) -> Result<()> {
        if idx == self.buffers.current && self.scroll_amt > 0 {
            let width = self.screen.size().0;
            self.scroll_amt += line.rendered_height(width);
        }
        let redraw = idx == self.buffers.current;
        self.buffers.add_line(idx, line, highlight);
        if redraw || highlight {
            self.draw()?;
        }
        Ok(())
    }

    /// Prepend older lines fetched from history.
    pub fn add_history_lines(&mut self, idx: usize, lines: Vec<Line>) -> Result<()> {
        let redraw = idx == self.buffers.current;
        self.buffers.add_history_lines(idx, lines);
        if redraw {
            self.draw()?;
        }
        Ok(())
    }

    pub fn typing_start(&mut self, idx: usize, nick: &str) -> Result<()> {
        self.buffers.typing_start(idx, nick);
        if idx == self.buffers.current {
            self.draw()?;
        }
        Ok(())
    }

    pub fn typing_stop(&mut self, idx: usize, nick: &str) -> Result<()> {
        self.buffers.typing_stop(idx, nick);
        if idx == self.buffers.current {
            self.draw()?;
        }
        Ok(())
    }

    pub fn input_rune(&mut self, r: char) -> Result<()> {
        self.editor.put_rune(r);
        self.draw()
    }

    pub fn input_backspace(&mut self) -> Result<()> {
        if self.editor.rem_rune() {
            self.draw()?;
        }
        Ok(())
    }

    pub fn input_left(&mut self) -> Result<()> {
        self.editor.left();
        self.draw()
    }

    pub fn input_right(&mut self) -> Result<()> {
        self.editor.right();
        self.draw()
    }

    /// Take the input line's content, resetting the editor.
    pub fn input_enter(&mut self) -> Result<String> {
        let content = self.editor.flush();
        self.draw()?;
        Ok(content)
    }

    pub fn input_is_command(&self) -> bool {
        self.editor.is_command()
    }

    pub fn input_len(&self) -> usize {
        self.editor.text_len()
    }

    /// Terminal size changed: reallocate the grid, drop every cached line
    /// height, reset the scroll anchor, repaint.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<()> {
        tracing::debug!(target: "ui", width, height, "resize");
        self.screen.resize(width, height);
        self.editor.resize(width);
        self.buffers.invalidate();
        self.scroll_amt = 0;
        self.draw()
    }

    /// Test and shutdown hook: hand the screen back.
    pub fn into_screen(self) -> S {
        self.screen
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_screen::MemoryScreen;

    fn ui() -> Ui<MemoryScreen> {
        Ui::new(MemoryScreen::new(20, 8), "welcome", None).unwrap()
    }

    #[test]
    fn initial_frame_shows_greeting_and_status() {
        let u = ui();
        let s = u.screen();
        assert_eq!(&s.row_text(4)[..7], "welcome");
        assert_eq!(&s.row_text(7)[..4], "home");
        assert_eq!(s.cursor(), Some((0, 6)));
        assert_eq!(s.commits, 1);
    }

    #[test]
    fn one_commit_per_operation() {
        let mut u = ui();
        u.input_rune('a').unwrap();
        u.input_rune('b').unwrap();
        assert_eq!(u.screen().commits, 3);
        // A no-op backspace at the start commits nothing.
        u.input_left().unwrap();
        u.input_left().unwrap();
        u.input_left().unwrap();
        let before = u.screen().commits;
        u.input_backspace().unwrap();
        assert_eq!(u.screen().commits, before);
    }

    #[test]
    fn typed_text_appears_on_the_input_row() {
        let mut u = ui();
        for ch in "/join #rust".chars() {
            u.input_rune(ch).unwrap();
        }
        assert!(u.input_is_command());
        assert_eq!(&u.screen().row_text(6)[..11], "/join #rust");
        assert_eq!(u.screen().cursor(), Some((11, 6)));
        assert_eq!(u.input_enter().unwrap(), "/join #rust");
        assert_eq!(u.input_len(), 0);
        assert_eq!(u.screen().row_text(6), " ".repeat(20));
    }

    #[test]
    fn add_buffer_selects_it() {
        let mut u = ui();
        let idx = u.add_buffer("#rust").unwrap();
        assert_eq!(u.current_buffer_idx(), idx);
        assert_eq!(u.current_buffer_title(), "#rust");
        assert_eq!(&u.screen().row_text(7)[..10], "home #rust");
    }

    #[test]
    fn lines_land_in_their_buffer() {
        let mut u = ui();
        let idx = u.add_buffer("#rust").unwrap();
        u.add_line(idx, Line::now("hello rust"), false).unwrap();
        assert_eq!(&u.screen().row_text(4)[..10], "hello rust");
        u.previous_buffer().unwrap();
        assert_eq!(&u.screen().row_text(4)[..7], "welcome");
    }

    #[test]
    fn scroll_clamps_at_both_ends() {
        let mut u = ui();
        // 5 scrollback rows; fill well past them.
        for n in 0..12 {
            u.add_line(0, Line::now(format!("m{n}")), false).unwrap();
        }
        assert!(!u.is_at_top());
        u.scroll_down().unwrap(); // already at bottom: no-op
        u.scroll_up().unwrap();
        u.scroll_up().unwrap();
        u.scroll_up().unwrap();
        u.scroll_up().unwrap();
        assert!(u.is_at_top());
        let commits = u.screen().commits;
        u.scroll_up().unwrap(); // clamped: no redraw
        assert_eq!(u.screen().commits, commits);
    }

    #[test]
    fn scroll_moves_half_the_screen_height() {
        let mut u = ui();
        for n in 0..12 {
            u.add_line(0, Line::now(format!("m{n}")), false).unwrap();
        }
        assert_eq!(&u.screen().row_text(0)[..2], "m7");
        // The step is half the full screen height (4 rows on an 8-row
        // screen), not half the scrollback region.
        u.scroll_up().unwrap();
        assert_eq!(&u.screen().row_text(0)[..2], "m3");
    }

    #[test]
    fn new_lines_do_not_shift_a_scrolled_view() {
        let mut u = ui();
        for n in 0..12 {
            u.add_line(0, Line::now(format!("m{n}")), false).unwrap();
        }
        u.scroll_up().unwrap();
        let top_before = u.screen().row_text(0);
        u.add_line(0, Line::now("newest"), false).unwrap();
        assert_eq!(u.screen().row_text(0), top_before);
    }

    #[test]
    fn typing_indicator_row_follows_buffer_state() {
        let mut u = ui();
        u.typing_start(0, "alice").unwrap();
        assert_eq!(&u.screen().row_text(5)[..18], "alice is typing...");
        u.typing_stop(0, "alice").unwrap();
        assert_eq!(u.screen().row_text(5), " ".repeat(20));
    }

    #[test]
    fn resize_repaints_from_scratch() {
        let mut u = ui();
        u.add_line(0, Line::now("stay"), false).unwrap();
        u.resize(30, 10).unwrap();
        assert_eq!(u.screen().size(), (30, 10));
        assert_eq!(&u.screen().row_text(6)[..4], "stay");
        assert_eq!(&u.screen().row_text(9)[..4], "home");
    }

    #[test]
    fn remove_buffer_returns_to_neighbor() {
        let mut u = ui();
        u.add_buffer("#a").unwrap();
        assert!(u.remove_buffer("#a").unwrap());
        assert_eq!(u.current_buffer_title(), "home");
        assert!(!u.remove_buffer("home").unwrap());
    }
}
