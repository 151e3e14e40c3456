//! Chat UI core: the input line editor and the scrollback renderer, composed
//! behind the [`Ui`] facade.
//!
//! Layering:
//! * [`editor`] — single-line input with width-indexed cursor bookkeeping and
//!   batched horizontal scrolling.
//! * [`scrollback`] — bottom-up viewport paging over wrapped lines, driving
//!   `core_chat::FlowCursor` and `core_chat::FormatMachine` per visible line.
//! * [`status`] / [`typing`] — the two reserved bottom-row companions.
//! * [`ui`] — owns a `Screen`, a `BufferList`, the scroll state, and the
//!   editor; every public operation ends in a single `commit`.
//!
//! All state here is mutated by one owner thread; nothing in this crate
//! blocks or locks.

pub mod editor;
pub mod scrollback;
pub mod status;
pub mod typing;
pub mod ui;

pub use editor::Editor;
pub use ui::Ui;
