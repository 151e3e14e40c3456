//! Chat line storage, wrap metadata, and inline format interpretation.
//!
//! This crate owns everything the scrollback renderer reads but does not
//! write: lines with their precomputed split points and cached row heights,
//! the control-rune state machine that decides which runes become glyphs,
//! and the per-channel buffer list (ordering, highlight counters, typing
//! lists, history retention). The format machine lives here, next to
//! `rendered_height`, because measuring and drawing must consume runes
//! identically; renderers drive both through `Line`, `FlowCursor`, and
//! `FormatMachine`.

pub mod buffers;
pub mod format;
pub mod line;
pub mod width;

pub use buffers::{Buffer, BufferList};
pub use format::{FormatMachine, Step, color_from_code};
pub use line::{FlowCursor, Line, SplitPoint};
pub use width::{rune_width, str_width};
