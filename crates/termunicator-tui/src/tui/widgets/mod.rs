pub mod input_line;
pub mod message_pane;
pub mod sidebar;
pub mod status_line;

pub use input_line::InputLine;
pub use message_pane::MessagePane;
pub use sidebar::Sidebar;
pub use status_line::StatusLine;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";

/// Take chars from `text` while they fit in `width` columns.
fn take_width(text: &str, width: usize) -> String {
    let mut used = 0;
    text.chars()
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= width
        })
        .collect()
}

/// Cut `text` to `width` columns, ending in "..." when there is room for it.
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width > ELLIPSIS.len() {
        let mut cut = take_width(text, width - ELLIPSIS.len());
        cut.push_str(ELLIPSIS);
        cut
    } else {
        take_width(text, width)
    }
}

/// Shorten a sidebar name to fit `width` columns, marking the cut with `~`.
pub fn shorten(name: &str, width: usize) -> String {
    if name.width() <= width {
        return name.to_string();
    }
    let mut cut = take_width(name, width.saturating_sub(1));
    cut.push('~');
    cut
}
