//! Display width of code points.
//!
//! Every width decision in the workspace flows through these two functions so
//! the editor's prefix sums, the split-point producer, and the renderer can
//! never disagree about how many columns a rune occupies. Control and
//! combining code points count 0, East Asian wide glyphs count 2, everything
//! else 1.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Terminal column width of one code point.
#[inline]
pub fn rune_width(r: char) -> usize {
    UnicodeWidthChar::width(r).unwrap_or(0)
}

/// Terminal column width of a string (sum over code points).
#[inline]
pub fn str_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}
