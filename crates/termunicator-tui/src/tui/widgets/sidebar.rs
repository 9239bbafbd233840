//! Sidebar widget: teams, channels and DMs.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use super::shorten;
use crate::tui::state::{NavIndex, NavItem};
use crate::tui::theme::{Component, Theme};

/// At most this many regular channels are listed.
pub const MAX_CHANNELS_SHOWN: usize = 9;

/// At most this many direct and group conversations are listed.
pub const MAX_DMS_SHOWN: usize = 5;

pub struct Sidebar<'a> {
    nav: &'a NavIndex,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> Sidebar<'a> {
    pub fn new(nav: &'a NavIndex, focused: bool, theme: &'a Theme) -> Self {
        Self {
            nav,
            focused,
            theme,
        }
    }

    fn header(&self, title: &str) -> Line<'static> {
        let text = if self.focused {
            format!("[{title}]")
        } else {
            format!("={title}=")
        };
        Line::styled(text, self.theme.style(Component::SidebarHeader))
    }

    fn entry(&self, current: bool, item: NavItem, label: &str, width: usize) -> Line<'static> {
        let (marker, style) = if current {
            (">", self.theme.style(Component::SidebarCurrent))
        } else if self.nav.selection() == item {
            ("*", self.theme.style(Component::SidebarSelected))
        } else {
            (" ", Style::default())
        };
        let mut text = format!("{marker}{label}");
        let pad = width.saturating_sub(text.width());
        text.push_str(&" ".repeat(pad));
        Line::styled(text, style)
    }
}

impl Widget for Sidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = usize::from(area.width);
        let name_width = width.saturating_sub(3);
        let nav = self.nav;
        let mut lines = vec![self.header("Teams")];

        for (i, team) in nav.teams().iter().enumerate() {
            let current = nav.active_team_index() == Some(i);
            let label = shorten(team.label(), name_width);
            lines.push(self.entry(current, NavItem::Team(i), &label, width));
        }

        lines.push(Line::default());
        lines.push(self.header("Channels"));
        if nav.is_team_selected() {
            let channels = nav
                .channels()
                .iter()
                .enumerate()
                .filter(|(_, channel)| !channel.is_direct())
                .take(MAX_CHANNELS_SHOWN);
            for (n, (i, channel)) in channels.enumerate() {
                let current = nav.active_channel_index() == Some(i);
                let label = format!("{}:{}", n + 1, shorten(channel.label(), name_width));
                lines.push(self.entry(current, NavItem::Channel(i), &label, width));
            }
        }

        lines.push(Line::default());
        lines.push(self.header("DMs"));
        if nav.is_team_selected() {
            let dms = nav
                .channels()
                .iter()
                .enumerate()
                .filter(|(_, channel)| channel.is_direct())
                .take(MAX_DMS_SHOWN);
            for (i, channel) in dms {
                let current = nav.active_channel_index() == Some(i);
                let label = shorten(channel.label(), name_width);
                lines.push(self.entry(current, NavItem::Dm(i), &label, width));
            }
        }

        Paragraph::new(lines).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::widgets::test_support::rows;
    use termunicator_platform::{Channel, ChannelKind, Team};

    fn channel(id: &str, kind: ChannelKind) -> Channel {
        Channel {
            id: id.to_string(),
            team_id: "t".to_string(),
            name: id.to_string(),
            display_name: String::new(),
            kind,
        }
    }

    #[test]
    fn renders_sections_with_markers() {
        let mut nav = NavIndex::new();
        nav.set_teams(vec![Team {
            id: "t".to_string(),
            name: "team".to_string(),
            display_name: "Team".to_string(),
        }]);
        nav.select_team(0);
        let mut channels: Vec<Channel> = (0..12)
            .map(|i| channel(&format!("c{i}"), ChannelKind::Public))
            .collect();
        channels.push(channel("alice", ChannelKind::Direct));
        nav.set_channels(channels);
        nav.set_active_channel(1);
        nav.select_first_conversation();

        let theme = Theme::default();
        let area = Rect::new(0, 0, 20, 18);
        let mut buf = Buffer::empty(area);
        Sidebar::new(&nav, true, &theme).render(area, &mut buf);

        let rows = rows(&buf);
        assert_eq!(rows[0], "[Teams]");
        assert_eq!(rows[1], ">Team");
        assert_eq!(rows[3], "[Channels]");
        assert_eq!(rows[4], "*1:c0");
        assert_eq!(rows[5], ">2:c1");
        assert_eq!(rows[12], " 9:c8");
        assert_eq!(rows[14], "[DMs]");
        assert_eq!(rows[15], " alice");
    }

    #[test]
    fn unfocused_headers_use_equals() {
        let nav = NavIndex::new();
        let theme = Theme::default();
        let area = Rect::new(0, 0, 20, 6);
        let mut buf = Buffer::empty(area);
        Sidebar::new(&nav, false, &theme).render(area, &mut buf);
        let rows = rows(&buf);
        assert_eq!(rows[0], "=Teams=");
        assert_eq!(rows[2], "=Channels=");
        assert_eq!(rows[4], "=DMs=");
    }
}
