//! Typing indicator row (third row from the bottom).

use core_chat::rune_width;
use core_screen::{Screen, Style};

/// Human-readable summary of who is typing, or `None` when nobody is.
pub fn compose_typing(nicks: &[String]) -> Option<String> {
    match nicks {
        [] => None,
        [one] => Some(format!("{one} is typing...")),
        [head @ .., last] => Some(format!("{} and {last} are typing...", head.join(", "))),
    }
}

/// Render (or clear) the typing row. The notice is dimmed and clipped to the
/// viewport; a glyph that would not fit entirely is dropped rather than
/// half-drawn.
pub fn draw_typing(screen: &mut impl Screen, nicks: &[String]) {
    let (width, height) = screen.size();
    if width == 0 || height < 3 {
        return;
    }
    let y = height - 3;
    let st = Style::default().dim(true);
    let mut x = 0;
    if let Some(text) = compose_typing(nicks) {
        for ch in text.chars() {
            let w = rune_width(ch);
            if x + w > width {
                break;
            }
            screen.set_cell(x, y, ch, st);
            x += w;
        }
    }
    while x < width {
        screen.set_cell(x, y, ' ', Style::default());
        x += 1;
    }
}
