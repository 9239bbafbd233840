//! One-line status: the latest notice, or where the user is.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Paragraph, Widget},
};

use super::truncate;
use crate::tui::theme::{Component, Theme};
use crate::tui::update::{Status, StatusLevel};

pub struct StatusLine<'a> {
    status: Option<&'a Status>,
    location: String,
    theme: &'a Theme,
}

impl<'a> StatusLine<'a> {
    /// `location` is shown when there is no status notice.
    pub fn new(status: Option<&'a Status>, location: String, theme: &'a Theme) -> Self {
        Self {
            status,
            location,
            theme,
        }
    }
}

impl Widget for StatusLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (text, component) = match self.status {
            Some(status) => {
                let component = match status.level {
                    StatusLevel::Info => Component::StatusInfo,
                    StatusLevel::Warn => Component::StatusWarn,
                    StatusLevel::Error => Component::StatusError,
                };
                (format!(" {} ", status.text), component)
            }
            None => (format!(" {} ", self.location), Component::StatusInfo),
        };
        Paragraph::new(truncate(&text, usize::from(area.width)))
            .style(self.theme.style(component))
            .render(area, buf);
    }
}
