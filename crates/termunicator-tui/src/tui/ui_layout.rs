//! Layout of the main screen: sidebar | separator | messages over status
//! and input lines.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Clear,
};

/// Sidebar width on normal terminals.
pub const SIDEBAR_WIDTH: u16 = 20;

/// Sidebar width below [`NARROW_TERMINAL_WIDTH`] columns.
pub const SIDEBAR_WIDTH_NARROW: u16 = 15;

pub const NARROW_TERMINAL_WIDTH: u16 = 50;

/// Computed layout areas for the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiLayout {
    pub sidebar: Rect,
    pub separator: Rect,
    pub messages: Rect,
    pub status: Rect,
    pub input: Rect,
    /// The full terminal area
    pub terminal: Rect,
}

impl UiLayout {
    pub fn compute(size: Rect) -> Self {
        let sidebar_width = if size.width < NARROW_TERMINAL_WIDTH {
            SIDEBAR_WIDTH_NARROW
        } else {
            SIDEBAR_WIDTH
        };
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(sidebar_width),
                Constraint::Length(1),
                Constraint::Min(1),
            ])
            .split(size);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // Messages
                Constraint::Length(1), // Status line
                Constraint::Length(1), // Input line
            ])
            .split(columns[2]);

        Self {
            sidebar: columns[0],
            separator: columns[1],
            messages: rows[0],
            status: rows[1],
            input: rows[2],
            terminal: size,
        }
    }

    pub fn prepare_background(&self, f: &mut Frame) {
        f.render_widget(Clear, self.terminal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::state::Viewport;

    #[test]
    fn message_area_matches_viewport() {
        let layout = UiLayout::compute(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.sidebar.width, SIDEBAR_WIDTH);
        assert_eq!(layout.messages.width, 80 - SIDEBAR_WIDTH - 1);
        assert_eq!(
            usize::from(layout.messages.height),
            Viewport::from_terminal_height(24).height
        );
        assert_eq!(layout.input.y, 23);
    }

    #[test]
    fn narrow_terminal_uses_small_sidebar() {
        let layout = UiLayout::compute(Rect::new(0, 0, 40, 10));
        assert_eq!(layout.sidebar.width, SIDEBAR_WIDTH_NARROW);
    }
}
