//! Cell style: attribute flags plus optional foreground/background colors.

pub use crossterm::style::Color;

/// Style applied to a single cell. `None` colors mean "terminal default".
///
/// The italic flag is carried even though some terminals ignore it; backends
/// decide whether to emit the attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub bold: bool,
    pub dim: bool,
    pub italic: bool,
    pub underline: bool,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

impl Style {
    pub fn bold(mut self, on: bool) -> Self {
        self.bold = on;
        self
    }

    pub fn dim(mut self, on: bool) -> Self {
        self.dim = on;
        self
    }

    pub fn italic(mut self, on: bool) -> Self {
        self.italic = on;
        self
    }

    pub fn underline(mut self, on: bool) -> Self {
        self.underline = on;
        self
    }

    pub fn fg(mut self, color: Option<Color>) -> Self {
        self.fg = color;
        self
    }

    pub fn bg(mut self, color: Option<Color>) -> Self {
        self.bg = color;
        self
    }
}
