//! Styles for the irssi-like look of the client.

use std::collections::HashMap;

use ratatui::style::{Color, Modifier, Style};

/// All styled components in the TUI
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Component {
    StatusInfo,
    StatusWarn,
    StatusError,
    Separator,
    SidebarHeader,
    /// Active team or channel
    SidebarCurrent,
    /// Sidebar cursor
    SidebarSelected,
    MessageTime,
    MessageNick,
    /// The message under the message cursor
    MessageHighlighted,
    InputLine,
}

#[derive(Debug, Clone)]
pub struct Theme {
    styles: HashMap<Component, Style>,
}

impl Default for Theme {
    fn default() -> Self {
        let styles = [
            (
                Component::StatusInfo,
                Style::default().fg(Color::White).bg(Color::Blue),
            ),
            (
                Component::StatusWarn,
                Style::default().fg(Color::Black).bg(Color::Yellow),
            ),
            (
                Component::StatusError,
                Style::default().fg(Color::White).bg(Color::Red),
            ),
            (Component::Separator, Style::default().fg(Color::DarkGray)),
            (
                Component::SidebarHeader,
                Style::default().add_modifier(Modifier::BOLD),
            ),
            (
                Component::SidebarCurrent,
                Style::default()
                    .fg(Color::LightYellow)
                    .add_modifier(Modifier::BOLD),
            ),
            (
                Component::SidebarSelected,
                Style::default()
                    .fg(Color::LightCyan)
                    .add_modifier(Modifier::BOLD),
            ),
            (Component::MessageTime, Style::default().fg(Color::DarkGray)),
            (Component::MessageNick, Style::default().fg(Color::LightGreen)),
            (
                Component::MessageHighlighted,
                Style::default().fg(Color::Black).bg(Color::LightCyan),
            ),
            (Component::InputLine, Style::default().fg(Color::White)),
        ];
        Self {
            styles: styles.into_iter().collect(),
        }
    }
}

impl Theme {
    pub fn style(&self, component: Component) -> Style {
        self.styles.get(&component).copied().unwrap_or_default()
    }
}
