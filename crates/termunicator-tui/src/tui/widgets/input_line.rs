//! The `[channel] text` input row.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Paragraph, Widget},
};

use super::truncate;
use crate::tui::state::InputBuffer;
use crate::tui::theme::{Component, Theme};

const CURSOR_BLOCK: char = '█';

pub struct InputLine<'a> {
    channel: &'a str,
    input: &'a InputBuffer,
    show_cursor: bool,
    theme: &'a Theme,
}

impl<'a> InputLine<'a> {
    pub fn new(channel: &'a str, input: &'a InputBuffer, show_cursor: bool, theme: &'a Theme) -> Self {
        Self {
            channel,
            input,
            show_cursor,
            theme,
        }
    }

    fn text(&self) -> String {
        let cursor = if self.show_cursor { CURSOR_BLOCK } else { ' ' };
        let mut shown: Vec<char> = self.input.display().chars().collect();
        let at = self.input.cursor().min(shown.len());
        shown.insert(at, cursor);
        format!("[{}] {}", self.channel, shown.into_iter().collect::<String>())
    }
}

impl Widget for InputLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = truncate(&self.text(), usize::from(area.width));
        Paragraph::new(text)
            .style(self.theme.style(Component::InputLine))
            .render(area, buf);
    }
}
