//! Single-line input editor with width-indexed cursor bookkeeping.
//!
//! The editor keeps, next to the text itself, a prefix-sum array of display
//! widths: `text_width[i]` is the column width of the first `i` runes. That
//! turns every cursor-to-column conversion during a redraw into an O(1)
//! lookup, at the cost of an O(n) fixup per edit — the right trade for an
//! interactive input line where redraws vastly outnumber keystrokes' edits.
//!
//! Invariants (hold after every public call):
//! * `text_width.len() == text.len() + 1` and `text_width[0] == 0`.
//! * `text_width` is non-decreasing; adjacent differences are the display
//!   widths of the corresponding runes.
//! * `cursor` stays in `[0, text.len()]`; `offset` in `[0, text.len() - 1]`
//!   (0 when empty).
//!
//! Horizontal scrolling is batched: when the cursor walks off either edge of
//! the viewport the offset jumps by [`RESCROLL_BATCH`] runes instead of one,
//! so a run of keystrokes pays for one rescroll, not one per key.

use core_chat::rune_width;
use core_screen::{Screen, Style};

/// Fixed jump applied to the view offset when the cursor leaves the
/// viewport. Contractual; see the scroll tests before changing it.
pub const RESCROLL_BATCH: usize = 16;

#[derive(Debug)]
pub struct Editor {
    /// Written runes, insertion order = display order.
    text: Vec<char>,
    /// `text_width[i]` is the display width of `text[..i]`.
    text_width: Vec<usize>,
    /// Rune index the caret sits before; `text.len()` means "at the end".
    cursor: usize,
    /// Number of leading runes skipped when rendering.
    offset: usize,
    /// Viewport width in columns.
    width: usize,
}

impl Editor {
    pub fn new(width: usize) -> Self {
        Self {
            text: Vec::new(),
            text_width: vec![0],
            cursor: 0,
            offset: 0,
            width,
        }
    }

    /// Shrinking forces a clean re-layout (cursor and offset back to 0)
    /// rather than attempting incremental repair; growing just records the
    /// new width.
    pub fn resize(&mut self, width: usize) {
        if width < self.width {
            self.cursor = 0;
            self.offset = 0;
        }
        self.width = width;
    }

    /// Whether the buffer starts with a `/` (command, not message).
    pub fn is_command(&self) -> bool {
        self.text.first() == Some(&'/')
    }

    pub fn text_len(&self) -> usize {
        self.text.len()
    }

    /// Insert a rune at the cursor and advance past it. Total: no failure
    /// modes, no rejected input.
    pub fn put_rune(&mut self, r: char) {
        let rw = rune_width(r);
        self.text.insert(self.cursor, r);
        let base = self.text_width[self.cursor];
        self.text_width.insert(self.cursor + 1, base + rw);
        // Every prefix after the insertion point shifts by the new rune's width.
        for w in &mut self.text_width[self.cursor + 2..] {
            *w += rw;
        }
        self.right();
    }

    /// Delete the rune before the cursor. Returns whether anything happened
    /// (callers use this to decide whether a redraw is due).
    pub fn rem_rune(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let rw = self.text_width[self.cursor] - self.text_width[self.cursor - 1];
        self.text.remove(self.cursor - 1);
        self.text_width.remove(self.cursor);
        for w in &mut self.text_width[self.cursor..] {
            *w -= rw;
        }
        self.left();
        true
    }

    /// Return the buffer as a string and reset to the empty state.
    pub fn flush(&mut self) -> String {
        let content: String = self.text.drain(..).collect();
        self.text_width.truncate(1);
        self.cursor = 0;
        self.offset = 0;
        content
    }

    pub fn right(&mut self) {
        if self.cursor == self.text.len() {
            return;
        }
        self.cursor += 1;
        if self.text_width[self.cursor] > self.text_width[self.offset] + self.width {
            self.offset += RESCROLL_BATCH;
            let max = self.text.len() - 1;
            if self.offset > max {
                self.offset = max;
            }
        }
    }

    pub fn left(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        if self.cursor <= self.offset {
            self.offset = self.offset.saturating_sub(RESCROLL_BATCH);
        }
    }

    /// Render the visible slice of the input line into row `y`, padding the
    /// remainder with spaces. Returns the cursor's column span
    /// `(start, end)` relative to the viewport so the caller can place the
    /// hardware cursor.
    pub fn draw(&self, screen: &mut impl Screen, y: usize) -> (usize, usize) {
        let st = Style::default();
        let mut x = 0;
        let mut i = self.offset;
        while i < self.text.len() && x < self.width {
            let r = self.text[i];
            screen.set_cell(x, y, r, st);
            x += rune_width(r);
            i += 1;
        }
        while x < self.width {
            screen.set_cell(x, y, ' ', st);
            x += 1;
        }

        // A batch jump can land the offset past the cursor in a viewport
        // narrower than the batch; the span saturates to the left edge.
        let start = self.text_width[self.cursor].saturating_sub(self.text_width[self.offset]);
        let end = if self.cursor + 1 < self.text_width.len() {
            self.text_width[self.cursor + 1].saturating_sub(self.text_width[self.offset])
        } else {
            start + 1
        };
        (start, end)
    }

    #[cfg(test)]
    fn check_invariants(&self) {
        assert_eq!(self.text_width.len(), self.text.len() + 1);
        assert_eq!(self.text_width[0], 0);
        for (i, pair) in self.text_width.windows(2).enumerate() {
            assert_eq!(pair[1] - pair[0], rune_width(self.text[i]));
        }
        assert!(self.cursor <= self.text.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_screen::MemoryScreen;
    use proptest::prelude::*;

    fn editor_with(width: usize, s: &str) -> Editor {
        let mut e = Editor::new(width);
        for ch in s.chars() {
            e.put_rune(ch);
        }
        e
    }

    #[test]
    fn insert_keeps_prefix_sums() {
        let mut e = editor_with(80, "ab界c");
        e.check_invariants();
        // Insert in the middle.
        e.left();
        e.left();
        e.put_rune('x');
        e.check_invariants();
        assert_eq!(e.flush(), "abx界c");
    }

    #[test]
    fn delete_at_start_is_noop() {
        let mut e = editor_with(80, "hi");
        e.left();
        e.left();
        assert!(!e.rem_rune());
        assert_eq!(e.flush(), "hi");
    }

    #[test]
    fn insert_then_delete_round_trips() {
        let mut e = editor_with(80, "hello");
        e.left();
        e.left();
        let cursor_before = e.cursor;
        e.put_rune('界');
        assert!(e.rem_rune());
        e.check_invariants();
        assert_eq!(e.cursor, cursor_before);
        assert_eq!(e.flush(), "hello");
    }

    #[test]
    fn flush_resets_everything() {
        let mut e = editor_with(80, "some text");
        assert_eq!(e.flush(), "some text");
        assert_eq!(e.text_len(), 0);
        assert_eq!(e.cursor, 0);
        assert_eq!(e.offset, 0);
        assert_eq!(e.flush(), "");
    }

    #[test]
    fn motion_clamps_at_both_ends() {
        let mut e = editor_with(80, "ab");
        e.right(); // already at end
        assert_eq!(e.cursor, 2);
        e.left();
        e.left();
        e.left(); // at start
        assert_eq!(e.cursor, 0);
    }

    #[test]
    fn rightward_rescroll_jumps_in_batches() {
        let mut e = editor_with(10, &"a".repeat(100));
        while e.cursor > 0 {
            e.left();
        }
        assert_eq!(e.offset, 0);
        let mut seen_offsets = vec![0];
        for _ in 0..100 {
            e.right();
            if *seen_offsets.last().unwrap() != e.offset {
                seen_offsets.push(e.offset);
            }
        }
        // Offset only ever moves by whole batches, never by 1.
        assert!(seen_offsets.len() > 2, "expected several rescrolls");
        for pair in seen_offsets.windows(2) {
            assert_eq!(pair[1] - pair[0], RESCROLL_BATCH);
        }
    }

    #[test]
    fn rightward_rescroll_clamps_to_text_end() {
        let mut e = Editor::new(4);
        for _ in 0..6 {
            e.put_rune('x');
        }
        // The batch jump would land at 16; it clamps to len - 1 at the
        // moment of the rescroll (5 runes written, so index 4).
        assert_eq!(e.offset, 4);
    }

    #[test]
    fn leftward_rescroll_jumps_back() {
        let mut e = Editor::new(10);
        for _ in 0..40 {
            e.put_rune('a');
        }
        let scrolled = e.offset;
        assert!(scrolled >= RESCROLL_BATCH);
        while e.cursor > 0 {
            e.left();
        }
        assert_eq!(e.offset, 0);
    }

    #[test]
    fn wide_runes_in_narrow_viewport_stay_total() {
        // A batch jump in a viewport narrower than the batch parks the
        // offset past the cursor; motion and drawing must absorb that
        // rather than underflow the prefix difference.
        let mut e = Editor::new(10);
        for _ in 0..40 {
            e.put_rune('界');
        }
        while e.cursor > 0 {
            e.left();
        }
        let mut screen = MemoryScreen::new(10, 1);
        for _ in 0..40 {
            e.right();
            e.draw(&mut screen, 0);
            e.check_invariants();
        }
        assert_eq!(e.cursor, 40);
    }

    #[test]
    fn shrink_resets_view() {
        let mut e = editor_with(10, "abcdefghijklmnopqrst");
        assert!(e.cursor > 0);
        e.resize(5);
        assert_eq!(e.cursor, 0);
        assert_eq!(e.offset, 0);
        // Growing keeps position.
        e.right();
        e.resize(30);
        assert_eq!(e.cursor, 1);
    }

    #[test]
    fn command_prefix_detection() {
        assert!(editor_with(80, "/nick foo").is_command());
        assert!(!editor_with(80, "nick foo").is_command());
        assert!(!Editor::new(80).is_command());
    }

    #[test]
    fn draw_reports_cursor_span() {
        let mut screen = MemoryScreen::new(10, 1);
        let e = editor_with(10, "hi界");
        let (start, end) = e.draw(&mut screen, 0);
        // Cursor at end of "hi界" (4 columns): degenerate 1-wide span.
        assert_eq!((start, end), (4, 5));
        assert_eq!(&screen.row_text(0), "hi界       ");
    }

    #[test]
    fn draw_cursor_span_covers_wide_rune() {
        let mut screen = MemoryScreen::new(10, 1);
        let mut e = editor_with(10, "hi界");
        e.left(); // caret before the wide rune
        let (start, end) = e.draw(&mut screen, 0);
        assert_eq!((start, end), (2, 4));
    }

    #[test]
    fn draw_pads_trailing_columns() {
        let mut screen = MemoryScreen::new(8, 1);
        let e = editor_with(8, "ok");
        e.draw(&mut screen, 0);
        assert_eq!(&screen.row_text(0), "ok      ");
    }

    proptest! {
        #[test]
        fn random_edit_sequences_hold_invariants(ops in prop::collection::vec(0u8..4, 0..200)) {
            let mut e = Editor::new(12);
            for op in ops {
                match op {
                    0 => e.put_rune('a'),
                    1 => e.put_rune('界'),
                    2 => { e.rem_rune(); }
                    3 => e.left(),
                    _ => e.right(),
                }
                e.check_invariants();
            }
        }
    }
}
