//! Message timeline: bottom-aligned `HH:MM <nick> text` rows.

use std::ops::Range;

use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use termunicator_platform::Message;
use unicode_width::UnicodeWidthStr;

use super::truncate;
use crate::tui::theme::{Component, Theme};

/// Columns taken by "HH:MM".
const TIME_WIDTH: usize = 5;

pub struct MessagePane<'a> {
    messages: &'a [Message],
    window: Range<usize>,
    cursor: Option<usize>,
    nick: &'a dyn Fn(&str) -> String,
    theme: &'a Theme,
}

impl<'a> MessagePane<'a> {
    /// `window` is the range of `messages` to draw, as computed by the
    /// scroll state for the pane height.
    pub fn new(
        messages: &'a [Message],
        window: Range<usize>,
        cursor: Option<usize>,
        nick: &'a dyn Fn(&str) -> String,
        theme: &'a Theme,
    ) -> Self {
        Self {
            messages,
            window,
            cursor,
            nick,
            theme,
        }
    }

    fn message_lines(&self, message: &Message, highlighted: bool, width: usize) -> Vec<Line<'static>> {
        let time = message
            .created_at
            .with_timezone(&Local)
            .format("%H:%M")
            .to_string();
        let nick = format!("<{}>", (self.nick)(&message.sender_id));
        // "HH:MM <nick> "
        let indent = TIME_WIDTH + 1 + nick.width() + 1;
        let available = width.saturating_sub(indent);

        let highlight = self.theme.style(Component::MessageHighlighted);
        let mut lines = Vec::with_capacity(message.line_count());
        for (index, text) in message.text.split('\n').enumerate() {
            let text = truncate(text, available);
            let line = match (index, highlighted) {
                (0, true) => Line::from(vec![
                    Span::styled(time.clone(), highlight),
                    Span::raw(" "),
                    Span::styled(nick.clone(), highlight),
                    Span::raw(" "),
                    Span::styled(text, highlight),
                ]),
                (0, false) => Line::from(vec![
                    Span::styled(time.clone(), self.theme.style(Component::MessageTime)),
                    Span::raw(" "),
                    Span::styled(nick.clone(), self.theme.style(Component::MessageNick)),
                    Span::raw(" "),
                    Span::raw(text),
                ]),
                (_, true) => Line::styled(format!("{}{text}", " ".repeat(indent)), highlight),
                (_, false) => Line::raw(format!("{}{text}", " ".repeat(indent))),
            };
            lines.push(line);
        }
        lines
    }
}

impl Widget for MessagePane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = usize::from(area.width);
        let height = usize::from(area.height);
        let window = self.window.start.min(self.messages.len())..self.window.end.min(self.messages.len());

        let mut lines = Vec::new();
        for (index, message) in self.messages[window.clone()].iter().enumerate() {
            let highlighted = self.cursor == Some(window.start + index);
            lines.extend(self.message_lines(message, highlighted, width));
        }

        // Bottom alignment. A window taller than the pane loses its top rows
        // so the newest message stays on screen.
        let overflow = lines.len().saturating_sub(height);
        let blank = height.saturating_sub(lines.len());
        let mut padded = vec![Line::default(); blank];
        padded.extend(lines.into_iter().skip(overflow));
        Paragraph::new(padded).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::widgets::test_support::rows;
    use chrono::{TimeZone, Utc};

    fn message(id: &str, sender: &str, text: &str) -> Message {
        Message {
            id: id.to_string(),
            channel_id: "c".to_string(),
            sender_id: sender.to_string(),
            text: text.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            thread_root_id: None,
        }
    }

    fn render(messages: &[Message], window: Range<usize>, width: u16, height: u16) -> Vec<String> {
        let theme = Theme::default();
        let nick = |id: &str| id.to_string();
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        MessagePane::new(messages, window, None, &nick, &theme).render(area, &mut buf);
        // Drop the local-time column so the assertions are timezone independent
        rows(&buf)
            .into_iter()
            .map(|row| row.chars().skip(TIME_WIDTH).collect())
            .collect()
    }

    #[test]
    fn messages_are_bottom_aligned() {
        let messages = vec![message("1", "ann", "hi"), message("2", "bob", "yo")];
        let rows = render(&messages, 0..2, 30, 4);
        assert_eq!(rows, vec!["", "", " <ann> hi", " <bob> yo"]);
    }

    #[test]
    fn continuation_lines_are_indented() {
        let messages = vec![message("1", "ann", "first\nsecond")];
        let rows = render(&messages, 0..1, 30, 2);
        assert_eq!(rows[0], " <ann> first");
        assert_eq!(rows[1], "       second");
    }

    #[test]
    fn long_lines_are_truncated() {
        let messages = vec![message("1", "ann", "abcdefghijklmnopqrstuvwxyz")];
        let rows = render(&messages, 0..1, 22, 1);
        // 22 columns minus "HH:MM <ann> " leaves 10
        assert_eq!(rows[0], " <ann> abcdefg...");
    }

    #[test]
    fn window_taller_than_pane_keeps_newest_rows() {
        let messages: Vec<Message> = (0..3)
            .map(|i| message(&i.to_string(), "ann", &format!("m{i}")))
            .collect();
        let rows = render(&messages, 0..3, 30, 2);
        assert_eq!(rows, vec![" <ann> m1", " <ann> m2"]);

        let tall = vec![message("1", "ann", "one\ntwo\nthree")];
        let rows = render(&tall, 0..1, 30, 1);
        assert_eq!(rows, vec!["       three"]);
    }

    #[test]
    fn only_the_window_is_drawn() {
        let messages: Vec<Message> = (0..5)
            .map(|i| message(&i.to_string(), "ann", &format!("m{i}")))
            .collect();
        let rows = render(&messages, 1..3, 30, 3);
        assert_eq!(rows, vec!["", " <ann> m1", " <ann> m2"]);
    }
}
