//! Per-channel buffers: ordering, selection, highlight counters, typing
//! lists, and history retention.
//!
//! Invariants:
//! * `list` is never empty; index 0 is the home buffer and cannot be removed.
//! * `current` always indexes into `list`.
//! * Selecting a buffer clears its highlight counter.
//! * `typings` holds each nick at most once.

use crate::line::Line;

const HOME_TITLE: &str = "home";

/// Greetings for the freshly created home buffer; one is picked
/// pseudo-randomly at startup.
pub const HOME_MESSAGES: &[&str] = &[
    "\u{02}confab\u{02} \u{1f}sine\u{1f} network, no \u{02}yak\u{02} required",
    "settle in, the \u{03}3scrollback\u{03} is warm",
    "say something, or type \u{02}/join\u{02} to make a room",
    "all quiet on the \u{03}12home\u{03} front",
];

#[derive(Debug, Clone)]
pub struct Buffer {
    pub title: String,
    pub highlights: usize,
    pub typings: Vec<String>,
    pub lines: Vec<Line>,
}

impl Buffer {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            highlights: 0,
            typings: Vec::new(),
            lines: Vec::new(),
        }
    }
}

/// Ordered buffer collection plus the selection index.
#[derive(Debug)]
pub struct BufferList {
    pub list: Vec<Buffer>,
    pub current: usize,
    /// Optional cap on retained lines per buffer; `None` keeps everything.
    pub limit: Option<usize>,
}

impl BufferList {
    /// Create the list with its home buffer seeded with `greeting`.
    pub fn new(greeting: impl Into<String>, limit: Option<usize>) -> Self {
        let mut home = Buffer::new(HOME_TITLE);
        home.lines.push(Line::now(greeting.into()));
        Self {
            list: vec![home],
            current: 0,
            limit,
        }
    }

    pub fn current_buffer(&self) -> &Buffer {
        &self.list[self.current]
    }

    pub fn current_buffer_mut(&mut self) -> &mut Buffer {
        &mut self.list[self.current]
    }

    /// Index of the buffer with the given title, if any.
    pub fn idx(&self, title: &str) -> Option<usize> {
        self.list.iter().position(|b| b.title == title)
    }

    /// Append a buffer unless the title already exists. Returns the index
    /// and whether a buffer was created.
    pub fn add(&mut self, title: &str) -> (usize, bool) {
        if let Some(i) = self.idx(title) {
            return (i, false);
        }
        self.list.push(Buffer::new(title));
        tracing::debug!(target: "chat.buffers", title, count = self.list.len(), "buffer_added");
        (self.list.len() - 1, true)
    }

    /// Remove a buffer by title. The home buffer stays; selection is
    /// adjusted so `current` keeps pointing at the same buffer when
    /// possible, or its left neighbor otherwise.
    pub fn remove(&mut self, title: &str) -> bool {
        let Some(i) = self.idx(title) else {
            return false;
        };
        if i == 0 {
            return false;
        }
        self.list.remove(i);
        if self.current >= i {
            self.current -= 1;
        }
        self.list[self.current].highlights = 0;
        true
    }

    /// Select the next buffer. Returns whether the selection moved.
    pub fn next(&mut self) -> bool {
        if self.current + 1 >= self.list.len() {
            return false;
        }
        self.current += 1;
        self.list[self.current].highlights = 0;
        true
    }

    /// Select the previous buffer. Returns whether the selection moved.
    pub fn previous(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        self.list[self.current].highlights = 0;
        true
    }

    /// Append a line. `highlight` bumps the counter only when the buffer is
    /// not the selected one. Retention: when a limit is set, the oldest
    /// lines beyond it are dropped.
    pub fn add_line(&mut self, idx: usize, line: Line, highlight: bool) {
        let current = self.current;
        let limit = self.limit;
        let Some(b) = self.list.get_mut(idx) else {
            return;
        };
        b.lines.push(line);
        if highlight && idx != current {
            b.highlights += 1;
        }
        if let Some(cap) = limit
            && b.lines.len() > cap
        {
            let excess = b.lines.len() - cap;
            b.lines.drain(..excess);
        }
    }

    /// Prepend older lines fetched from history.
    pub fn add_history_lines(&mut self, idx: usize, lines: Vec<Line>) {
        let Some(b) = self.list.get_mut(idx) else {
            return;
        };
        b.lines.splice(0..0, lines);
    }

    pub fn typing_start(&mut self, idx: usize, nick: &str) {
        let Some(b) = self.list.get_mut(idx) else {
            return;
        };
        if !b.typings.iter().any(|n| n == nick) {
            b.typings.push(nick.to_string());
        }
    }

    pub fn typing_stop(&mut self, idx: usize, nick: &str) {
        let Some(b) = self.list.get_mut(idx) else {
            return;
        };
        b.typings.retain(|n| n != nick);
    }

    /// Drop every cached row height (viewport width changed).
    pub fn invalidate(&mut self) {
        for b in &mut self.list {
            for l in &mut b.lines {
                l.invalidate();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> BufferList {
        BufferList::new("welcome", None)
    }

    #[test]
    fn starts_with_home_selected() {
        let bs = list();
        assert_eq!(bs.list.len(), 1);
        assert_eq!(bs.current, 0);
        assert_eq!(bs.current_buffer().title, "home");
        assert_eq!(bs.current_buffer().lines.len(), 1);
    }

    #[test]
    fn add_is_idempotent_per_title() {
        let mut bs = list();
        let (i1, created1) = bs.add("#rust");
        let (i2, created2) = bs.add("#rust");
        assert!(created1);
        assert!(!created2);
        assert_eq!(i1, i2);
        assert_eq!(bs.list.len(), 2);
    }

    #[test]
    fn home_cannot_be_removed() {
        let mut bs = list();
        assert!(!bs.remove("home"));
        assert_eq!(bs.list.len(), 1);
    }

    #[test]
    fn remove_adjusts_selection() {
        let mut bs = list();
        bs.add("#a");
        bs.add("#b");
        bs.next();
        bs.next(); // now on #b
        assert!(bs.remove("#a"));
        assert_eq!(bs.current_buffer().title, "#b");
        assert!(bs.remove("#b"));
        assert_eq!(bs.current_buffer().title, "home");
    }

    #[test]
    fn next_previous_clamp_at_ends() {
        let mut bs = list();
        assert!(!bs.previous());
        assert!(!bs.next());
        bs.add("#a");
        assert!(bs.next());
        assert!(!bs.next());
        assert!(bs.previous());
        assert!(!bs.previous());
    }

    #[test]
    fn highlight_counts_only_unselected_buffers() {
        let mut bs = list();
        let (i, _) = bs.add("#a");
        bs.add_line(i, Line::now("ping"), true);
        assert_eq!(bs.list[i].highlights, 1);
        bs.add_line(0, Line::now("hi"), true);
        assert_eq!(bs.list[0].highlights, 0, "selected buffer never counts");
        // Selecting clears.
        bs.next();
        assert_eq!(bs.current_buffer().highlights, 0);
    }

    #[test]
    fn retention_limit_drops_oldest() {
        let mut bs = BufferList::new("welcome", Some(3));
        for n in 0..5 {
            bs.add_line(0, Line::now(format!("m{n}")), false);
        }
        let lines = &bs.list[0].lines;
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].content(), "m2");
        assert_eq!(lines[2].content(), "m4");
    }

    #[test]
    fn history_lines_prepend() {
        let mut bs = list();
        bs.add_line(0, Line::now("new"), false);
        bs.add_history_lines(0, vec![Line::now("old1"), Line::now("old2")]);
        let titles: Vec<_> = bs.list[0].lines.iter().map(|l| l.content()).collect();
        assert_eq!(titles, vec!["old1", "old2", "welcome", "new"]);
    }

    #[test]
    fn typing_list_is_a_set() {
        let mut bs = list();
        bs.typing_start(0, "alice");
        bs.typing_start(0, "alice");
        bs.typing_start(0, "bob");
        assert_eq!(bs.list[0].typings, vec!["alice", "bob"]);
        bs.typing_stop(0, "alice");
        assert_eq!(bs.list[0].typings, vec!["bob"]);
        bs.typing_stop(0, "carol"); // absent: no-op
        assert_eq!(bs.list[0].typings, vec!["bob"]);
    }
}
