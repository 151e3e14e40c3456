//! Bottom-anchored scrollback rendering.
//!
//! The scrollback region is everything above the three reserved bottom rows
//! (typing indicator, input line, status bar). Lines are laid out bottom-up:
//! the walk starts below the region, moves the anchor up by each line's
//! rendered height from newest to oldest, and draws whatever intersects the
//! viewport. `scroll_amt` pushes the anchor down by that many rows, which
//! scrolls older content into view.
//!
//! The walk and [`core_chat::Line::rendered_height`] share the same
//! [`FlowCursor`] rules, so a line's measured height always matches the rows
//! the drawing pass touches.

use core_chat::{Buffer, FlowCursor, FormatMachine, Line, Step, rune_width};
use core_screen::{Screen, Style};

/// Redraw the scrollback region for one buffer. Returns whether the top of
/// the oldest line is visible, which callers use to clamp scrolling and to
/// trigger history fetches.
pub fn draw_scrollback(screen: &mut impl Screen, buffer: &mut Buffer, scroll_amt: usize) -> bool {
    let (width, height) = screen.size();
    if width == 0 || height < 4 {
        return true;
    }
    let rows = (height - 3) as i64;
    for y in 0..height - 3 {
        for x in 0..width {
            screen.set_cell(x, y, ' ', Style::default());
        }
    }

    let mut y0 = scroll_amt as i64 + rows;
    for line in buffer.lines.iter_mut().rev() {
        let h = line.rendered_height(width) as i64;
        y0 -= h;
        if y0 >= rows {
            // Scrolled up: this line sits entirely below the viewport.
            continue;
        }
        draw_line(screen, line, y0, width, rows);
        if y0 < 0 {
            break;
        }
    }
    tracing::trace!(target: "ui.scrollback", scroll_amt, at_top = y0 >= 0, "redraw");
    y0 >= 0
}

/// Draw one line with its top row at `y0` (possibly negative), clipping to
/// `0..rows`. A fresh [`FormatMachine`] per line keeps styling from leaking
/// across lines.
fn draw_line(screen: &mut impl Screen, line: &Line, y0: i64, width: usize, rows: i64) {
    let mut fm = FormatMachine::new();
    let mut flow = FlowCursor::new(line.split_points(), width);
    let dim = line.is_status();
    for (i, &r) in line.runes().iter().enumerate() {
        if !flow.step(i) {
            continue;
        }
        match fm.feed(r) {
            Step::Skip => {}
            Step::Glyph(ch, st) => {
                let (x, y) = flow.advance(rune_width(ch));
                put(screen, x, y0 + y as i64, ch, dimmed(st, dim), rows);
            }
            Step::Comma(st) => {
                let (x, y) = flow.advance(1);
                put(screen, x, y0 + y as i64, ',', dimmed(st, dim), rows);
                flow.wrap_if_full();
            }
            Step::CommaGlyph(cst, ch, gst) => {
                let (x, y) = flow.advance(1);
                put(screen, x, y0 + y as i64, ',', dimmed(cst, dim), rows);
                flow.wrap_if_full();
                let (x, y) = flow.advance(rune_width(ch));
                put(screen, x, y0 + y as i64, ch, dimmed(gst, dim), rows);
            }
        }
    }
}

fn dimmed(mut st: Style, dim: bool) -> Style {
    st.dim |= dim;
    st
}

fn put(screen: &mut impl Screen, x: usize, row: i64, ch: char, st: Style, rows: i64) {
    if row < 0 || row >= rows {
        return;
    }
    screen.set_cell(x, row as usize, ch, st);
}
