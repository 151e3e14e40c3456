//! Buffer status bar (bottom row).
//!
//! Lists every buffer title in order, space-separated. The selected buffer
//! is underlined; a buffer with pending highlights is bold. When the full
//! list is wider than the screen, rendering starts one title before the
//! selection so the selected title and its left neighbor stay visible.

use core_chat::{BufferList, rune_width, str_width};
use core_screen::{Screen, Style};

pub fn draw_status(screen: &mut impl Screen, buffers: &BufferList) {
    let (width, height) = screen.size();
    if width == 0 || height == 0 {
        return;
    }
    let y = height - 1;

    let total: usize = buffers
        .list
        .iter()
        .map(|b| str_width(&b.title) + 1)
        .sum::<usize>()
        .saturating_sub(1);
    let start = if total > width {
        buffers.current.saturating_sub(1)
    } else {
        0
    };

    let mut x = 0;
    for (i, b) in buffers.list.iter().enumerate().skip(start) {
        if i > start {
            if x >= width {
                break;
            }
            screen.set_cell(x, y, ' ', Style::default());
            x += 1;
        }
        let st = Style::default()
            .underline(i == buffers.current)
            .bold(b.highlights > 0);
        for ch in b.title.chars() {
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
