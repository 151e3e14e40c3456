//! Inline formatting control runes.
//!
//! Chat lines embed a legacy inline syntax: `0x02` toggles bold, `0x1D`
//! italic, `0x1F` underline, `0x00`/`0x0F` reset everything, and `0x03`
//! introduces a numeric color code of the form `<fg>[,<bg>]` with one or two
//! digits per side. The machine consumes one rune at a time and reports what
//! (if anything) should be drawn; control runes are consumed silently.
//!
//! The digit grouping is ambiguous by design, so the grammar is total: every
//! rune has a defined effect in every state, and a malformed sequence
//! degrades to applying whatever was accumulated and reprocessing the
//! offending rune in the normal state. The one visible artifact is the
//! dangling comma case (`0x03` + digits + `,` + non-digit), where the comma
//! is emitted as a literal glyph.
//!
//! State is plain data scoped to one line's render pass: create a machine per
//! line and the per-line style reset comes for free.

use core_screen::{Color, Style};

/// Map a numeric color code onto the terminal palette. `None` is the
/// terminal default; codes outside the named range pass through as raw
/// palette indices.
pub fn color_from_code(code: u32) -> Option<Color> {
    match code {
        0 => Some(Color::White),
        1 => Some(Color::Black),
        2 => Some(Color::DarkBlue),
        3 => Some(Color::DarkGreen),
        4 => Some(Color::DarkRed),
        5 => Some(Color::DarkYellow), // brown
        6 => Some(Color::DarkMagenta), // purple
        7 => Some(Color::AnsiValue(208)), // orange
        8 => Some(Color::Yellow),
        9 => Some(Color::Green), // light green
        10 => Some(Color::DarkCyan), // teal
        11 => Some(Color::Magenta), // fuchsia
        12 => Some(Color::Blue), // light blue
        13 => Some(Color::AnsiValue(213)), // pink
        14 => Some(Color::DarkGrey),
        15 => Some(Color::Grey),
        99 => None,
        other => Some(Color::AnsiValue(other as u8)),
    }
}

/// Parse position inside the color-introducer grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ColorState {
    #[default]
    Normal,
    /// `0x03` seen; expecting the first foreground digit.
    FgDigit1,
    /// One foreground digit accumulated.
    FgDigit2,
    /// Two foreground digits accumulated; only `,` extends the sequence.
    FgDigit3,
    /// Comma seen; expecting the first background digit.
    BgStart,
    /// One background digit accumulated.
    BgDigit2,
}

/// What one consumed rune produces on screen. Each emitted glyph carries the
/// style that was active at its emission point. The comma variants exist
/// because a dangling color comma materializes a glyph with no source rune
/// of its own, and the caller owes it an immediate wrap check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Control rune consumed; draw nothing.
    Skip,
    /// Literal glyph at the current style.
    Glyph(char, Style),
    /// Dangling comma emitted; the rune that ended the grammar was itself a
    /// control rune and produced nothing.
    Comma(Style),
    /// Dangling comma emitted, followed by the literal that ended the
    /// grammar.
    CommaGlyph(Style, char, Style),
}

#[derive(Debug, Default)]
pub struct FormatMachine {
    bold: bool,
    italic: bool,
    underline: bool,
    fg: Option<Color>,
    bg: Option<Color>,
    fg_code: u32,
    bg_code: u32,
    state: ColorState,
}

impl FormatMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Style currently in effect for literal glyphs.
    pub fn style(&self) -> Style {
        Style {
            bold: self.bold,
            dim: false,
            italic: self.italic,
            underline: self.underline,
            fg: self.fg,
            bg: self.bg,
        }
    }

    /// Consume one rune.
    pub fn feed(&mut self, r: char) -> Step {
        match self.state {
            ColorState::Normal => self.feed_normal(r),
            ColorState::FgDigit1 => {
                self.fg_code = 0;
                self.bg_code = 0;
                if let Some(d) = r.to_digit(10) {
                    self.fg_code = d;
                    self.state = ColorState::FgDigit2;
                    Step::Skip
                } else {
                    // No digit at all: the introducer clears both colors.
                    self.fg = None;
                    self.bg = None;
                    self.state = ColorState::Normal;
                    self.feed_normal(r)
                }
            }
            ColorState::FgDigit2 => {
                if let Some(d) = r.to_digit(10) {
                    self.fg_code = self.fg_code * 10 + d;
                    self.state = ColorState::FgDigit3;
                    Step::Skip
                } else if r == ',' {
                    self.state = ColorState::BgStart;
                    Step::Skip
                } else {
                    self.fg = color_from_code(self.fg_code);
                    self.state = ColorState::Normal;
                    self.feed_normal(r)
                }
            }
            ColorState::FgDigit3 => {
                if r == ',' {
                    self.state = ColorState::BgStart;
                    Step::Skip
                } else {
                    self.fg = color_from_code(self.fg_code);
                    self.state = ColorState::Normal;
                    self.feed_normal(r)
                }
            }
            ColorState::BgStart => {
                if let Some(d) = r.to_digit(10) {
                    self.bg_code = d;
                    self.state = ColorState::BgDigit2;
                    Step::Skip
                } else {
                    // The comma turned out not to introduce a background:
                    // apply the foreground, surface the comma literally, then
                    // reprocess the rune that broke the sequence.
                    self.fg = color_from_code(self.fg_code);
                    self.state = ColorState::Normal;
                    let comma_style = self.style();
                    match self.feed_normal(r) {
                        Step::Skip => Step::Comma(comma_style),
                        Step::Glyph(ch, st) => Step::CommaGlyph(comma_style, ch, st),
                        // feed_normal never emits comma variants.
                        other => other,
                    }
                }
            }
            ColorState::BgDigit2 => {
                self.fg = color_from_code(self.fg_code);
                self.state = ColorState::Normal;
                if let Some(d) = r.to_digit(10) {
                    self.bg_code = self.bg_code * 10 + d;
                    self.bg = color_from_code(self.bg_code);
                    Step::Skip
                } else {
                    self.bg = color_from_code(self.bg_code);
                    self.feed_normal(r)
                }
            }
        }
    }

    fn feed_normal(&mut self, r: char) -> Step {
        match r {
            '\u{00}' | '\u{0f}' => {
                *self = Self::default();
                Step::Skip
            }
            '\u{02}' => {
                self.bold = !self.bold;
                Step::Skip
            }
            '\u{03}' => {
                self.state = ColorState::FgDigit1;
                Step::Skip
            }
            '\u{1d}' => {
                self.italic = !self.italic;
                Step::Skip
            }
            '\u{1f}' => {
                self.underline = !self.underline;
                Step::Skip
            }
            _ => Step::Glyph(r, self.style()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive the machine over a whole string, collecting emitted glyphs.
    fn run(input: &str) -> (Vec<(char, Style)>, FormatMachine) {
        let mut m = FormatMachine::new();
        let mut out = Vec::new();
        for r in input.chars() {
            match m.feed(r) {
                Step::Skip => {}
                Step::Glyph(ch, st) => out.push((ch, st)),
                Step::Comma(st) => out.push((',', st)),
                Step::CommaGlyph(cst, ch, gst) => {
                    out.push((',', cst));
                    out.push((ch, gst));
                }
            }
        }
        (out, m)
    }

    fn glyphs(out: &[(char, Style)]) -> String {
        out.iter().map(|(ch, _)| *ch).collect()
    }

    #[test]
    fn bold_toggle_spans_glyphs() {
        let (out, m) = run("\u{02}bold\u{02}after");
        assert_eq!(glyphs(&out), "boldafter");
        for (ch, st) in &out[..4] {
            assert!(st.bold, "expected bold {ch}");
        }
        for (_, st) in &out[4..] {
            assert!(!st.bold);
        }
        assert!(!m.style().bold);
    }

    #[test]
    fn single_digit_foreground() {
        let (out, m) = run("\u{03}4red");
        assert_eq!(glyphs(&out), "red");
        for (_, st) in &out {
            assert_eq!(st.fg, Some(Color::DarkRed));
            assert_eq!(st.bg, None);
        }
        assert_eq!(m.style().fg, Some(Color::DarkRed));
    }

    #[test]
    fn two_digit_foreground_and_background() {
        let (out, _) = run("\u{03}00,99x");
        assert_eq!(glyphs(&out), "x");
        let (_, st) = out[0];
        assert_eq!(st.fg, Some(Color::White));
        assert_eq!(st.bg, None, "99 is the terminal default sentinel");
    }

    #[test]
    fn foreground_only_leaves_background() {
        let (out, _) = run("\u{03}01,02a\u{03}3b");
        let (_, a) = out[0];
        assert_eq!(a.fg, Some(Color::Black));
        assert_eq!(a.bg, Some(Color::DarkBlue));
        let (_, b) = out[1];
        assert_eq!(b.fg, Some(Color::DarkGreen));
        assert_eq!(b.bg, Some(Color::DarkBlue), "background untouched");
    }

    #[test]
    fn introducer_without_digits_clears_colors() {
        let (out, _) = run("\u{03}4x\u{03}y");
        let (_, x) = out[0];
        assert_eq!(x.fg, Some(Color::DarkRed));
        let (_, y) = out[1];
        assert_eq!(y.fg, None);
        assert_eq!(y.bg, None);
    }

    #[test]
    fn dangling_comma_is_rendered() {
        let (out, _) = run("\u{03}3,x");
        assert_eq!(glyphs(&out), ",x");
        let (_, comma) = out[0];
        assert_eq!(comma.fg, Some(Color::DarkGreen));
        let (_, x) = out[1];
        assert_eq!(x.fg, Some(Color::DarkGreen));
    }

    #[test]
    fn dangling_comma_before_control_rune() {
        let (out, m) = run("\u{03}3,\u{02}x");
        assert_eq!(glyphs(&out), ",x");
        let (_, comma) = out[0];
        assert!(!comma.bold, "comma emitted before the toggle lands");
        let (_, x) = out[1];
        assert!(x.bold);
        assert!(m.style().bold);
    }

    #[test]
    fn one_digit_background_applies_on_termination() {
        let (out, _) = run("\u{03}4,5x");
        let (_, x) = out[0];
        assert_eq!(x.fg, Some(Color::DarkRed));
        assert_eq!(x.bg, Some(Color::DarkYellow));
    }

    #[test]
    fn two_digit_background_applies_immediately() {
        let (out, m) = run("\u{03}4,10x");
        let (_, x) = out[0];
        assert_eq!(x.fg, Some(Color::DarkRed));
        assert_eq!(x.bg, Some(Color::DarkCyan));
        assert_eq!(m.style().bg, Some(Color::DarkCyan));
    }

    #[test]
    fn reset_clears_attributes_and_colors() {
        let (out, m) = run("\u{02}\u{1f}\u{03}4a\u{0f}b");
        let (_, a) = out[0];
        assert!(a.bold && a.underline);
        assert_eq!(a.fg, Some(Color::DarkRed));
        let (_, b) = out[1];
        assert_eq!(b, Style::default());
        assert_eq!(m.style(), Style::default());
    }

    #[test]
    fn italic_is_tracked() {
        let (out, _) = run("\u{1d}i\u{1d}j");
        let (_, i) = out[0];
        assert!(i.italic);
        let (_, j) = out[1];
        assert!(!j.italic);
    }

    #[test]
    fn unknown_codes_pass_through_as_palette_indices() {
        let (out, _) = run("\u{03}42x");
        let (_, x) = out[0];
        assert_eq!(x.fg, Some(Color::AnsiValue(42)));
    }

    #[test]
    fn digit_after_two_digit_foreground_is_literal() {
        // FgDigit3 accepts no third digit: "123" is fg 12 then literal '3'.
        let (out, _) = run("\u{03}123");
        assert_eq!(glyphs(&out), "3");
        let (_, three) = out[0];
        assert_eq!(three.fg, Some(Color::Blue));
    }
}
