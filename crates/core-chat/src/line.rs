//! A single chat line and its wrap metadata.
//!
//! Wrapping happens in two stages. At construction time the split-point
//! producer scans the content once and records a breakpoint at every
//! transition between breakable runes (whitespace) and unbreakable runes,
//! plus one unconditional terminal point at the end of the text. At render
//! time a [`FlowCursor`] consumes those points rune by rune to decide when a
//! row ends, and the same walk (minus glyph output) yields the line's row
//! height for a given viewport width, so layout and drawing can never
//! disagree.
//!
//! Invariants:
//! * `split_points` is non-empty, strictly increasing in rune index, and its
//!   last entry sits at `(len, total_width)`.
//! * A point's `split` flag is true when the run starting at that point is
//!   breakable (whitespace) — such runs are suppressed at row starts.
//! * `rendered_height` is at least 1, including for empty content.

use crate::format::{FormatMachine, Step};
use crate::width::rune_width;
use std::time::SystemTime;

/// Precomputed breakpoint: rune index, cumulative display width up to that
/// rune, and whether the run starting here is a real break opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitPoint {
    pub i: usize,
    pub x: usize,
    pub split: bool,
}

fn is_break_rune(r: char) -> bool {
    r == ' ' || r == '\t'
}

fn compute_split_points(runes: &[char]) -> Vec<SplitPoint> {
    let mut points = Vec::new();
    let mut x = 0;
    let mut in_break = false;
    for (i, &r) in runes.iter().enumerate() {
        let breakable = is_break_rune(r);
        if i == 0 || breakable != in_break {
            points.push(SplitPoint {
                i,
                x,
                split: breakable,
            });
            in_break = breakable;
        }
        x += rune_width(r);
    }
    points.push(SplitPoint {
        i: runes.len(),
        x,
        split: true,
    });
    points
}

/// Row/column walk over one line's runes, driven by its split points.
///
/// The cursor is scoped to a single render (or measuring) pass: create it,
/// feed it every rune index in order via [`FlowCursor::step`], and place each
/// kept glyph with [`FlowCursor::advance`]. `y` is relative to the line's top
/// row; callers add their own vertical offset.
#[derive(Debug)]
pub struct FlowCursor<'a> {
    points: &'a [SplitPoint],
    width: usize,
    idx: usize,
    pub x: usize,
    pub y: usize,
}

impl<'a> FlowCursor<'a> {
    pub fn new(points: &'a [SplitPoint], width: usize) -> Self {
        Self {
            points,
            width,
            idx: 0,
            x: 0,
            y: 0,
        }
    }

    /// Pre-glyph bookkeeping for rune index `i`. Returns `false` when the
    /// rune must be skipped entirely (breakable padding at a fresh row); a
    /// skipped rune is not shown to any downstream consumer either.
    pub fn step(&mut self, i: usize) -> bool {
        if self.idx < self.points.len() && i == self.points[self.idx].i {
            let here = self.points[self.idx];
            self.idx += 1;
            if let Some(next) = self.points.get(self.idx) {
                let seg = next.x - here.x;
                if seg > self.width {
                    // Wider than the viewport: the column-overflow check
                    // below wraps it mid-segment.
                } else if seg == self.width {
                    if self.x == 0 {
                        self.y += 1;
                    }
                } else if self.x + seg > self.width {
                    self.y += 1;
                    self.x = 0;
                }
            }
        }
        if let Some(next) = self.points.get(self.idx)
            && !next.split
            && self.x == 0
        {
            return false;
        }
        if self.x >= self.width {
            self.y += 1;
            self.x = 0;
        }
        true
    }

    /// Position of the next glyph; advances the column by `glyph_width`.
    pub fn advance(&mut self, glyph_width: usize) -> (usize, usize) {
        let pos = (self.x, self.y);
        self.x += glyph_width;
        pos
    }

    /// Immediate wrap check, applied after mid-grammar comma emission (a
    /// glyph materializing without a corresponding source rune).
    pub fn wrap_if_full(&mut self) {
        if self.x >= self.width {
            self.y += 1;
            self.x = 0;
        }
    }
}

/// One stored chat line. Content may embed inline formatting control runes;
/// height measurement runs them through the same [`FormatMachine`] the
/// renderer uses, so only runes that actually become glyphs occupy columns.
#[derive(Debug, Clone)]
pub struct Line {
    content: String,
    runes: Vec<char>,
    at: SystemTime,
    is_status: bool,
    split_points: Vec<SplitPoint>,
    height_cache: Option<(usize, usize)>,
}

impl Line {
    pub fn new(content: impl Into<String>, at: SystemTime, is_status: bool) -> Self {
        let content = content.into();
        let runes: Vec<char> = content.chars().collect();
        let split_points = compute_split_points(&runes);
        Self {
            content,
            runes,
            at,
            is_status,
            split_points,
            height_cache: None,
        }
    }

    pub fn now(content: impl Into<String>) -> Self {
        Self::new(content, SystemTime::now(), false)
    }

    pub fn status_now(content: impl Into<String>) -> Self {
        Self::new(content, SystemTime::now(), true)
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn runes(&self) -> &[char] {
        &self.runes
    }

    pub fn split_points(&self) -> &[SplitPoint] {
        &self.split_points
    }

    pub fn at(&self) -> SystemTime {
        self.at
    }

    pub fn is_status(&self) -> bool {
        self.is_status
    }

    /// Number of terminal rows this line occupies at the given viewport
    /// width. Cached per width; resizing invalidates through
    /// [`Line::invalidate`].
    pub fn rendered_height(&mut self, width: usize) -> usize {
        if let Some((w, rows)) = self.height_cache
            && w == width
        {
            return rows;
        }
        let mut flow = FlowCursor::new(&self.split_points, width);
        let mut fm = FormatMachine::new();
        for (i, &r) in self.runes.iter().enumerate() {
            if !flow.step(i) {
                continue;
            }
            match fm.feed(r) {
                Step::Skip => {}
                Step::Glyph(ch, _) => {
                    flow.advance(rune_width(ch));
                }
                Step::Comma(_) => {
                    flow.advance(1);
                    flow.wrap_if_full();
                }
                Step::CommaGlyph(_, ch, _) => {
                    flow.advance(1);
                    flow.wrap_if_full();
                    flow.advance(rune_width(ch));
                }
            }
        }
        let rows = flow.y + 1;
        self.height_cache = Some((width, rows));
        rows
    }

    /// Drop the cached height (viewport width changed).
    pub fn invalidate(&mut self) {
        self.height_cache = None;
    }
}
