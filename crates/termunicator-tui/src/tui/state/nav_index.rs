//! Sidebar navigation: teams, channels and DMs flattened into one list.

use termunicator_platform::{Channel, Team};

/// A sidebar entry. Indices point into the team or channel collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavItem {
    Team(usize),
    Channel(usize),
    Dm(usize),
}

impl Default for NavItem {
    fn default() -> Self {
        Self::Team(0)
    }
}

#[derive(Debug, Default)]
pub struct NavIndex {
    teams: Vec<Team>,
    channels: Vec<Channel>,
    active_team: Option<usize>,
    active_channel: Option<usize>,
    selection: NavItem,
    items: Vec<NavItem>,
    dirty: bool,
}

impl NavIndex {
    pub fn new() -> Self {
        Self {
            dirty: true,
            ..Self::default()
        }
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn team(&self, index: usize) -> Option<&Team> {
        self.teams.get(index)
    }

    pub fn channel(&self, index: usize) -> Option<&Channel> {
        self.channels.get(index)
    }

    pub fn active_team(&self) -> Option<&Team> {
        self.active_team.and_then(|index| self.teams.get(index))
    }

    pub fn active_team_index(&self) -> Option<usize> {
        self.active_team
    }

    pub fn active_channel(&self) -> Option<&Channel> {
        self.active_channel.and_then(|index| self.channels.get(index))
    }

    pub fn active_channel_index(&self) -> Option<usize> {
        self.active_channel
    }

    pub fn is_team_selected(&self) -> bool {
        self.active_team.is_some()
    }

    pub fn selection(&self) -> NavItem {
        self.selection
    }

    pub fn set_teams(&mut self, teams: Vec<Team>) {
        self.teams = teams;
        self.active_team = None;
        self.active_channel = None;
        self.channels.clear();
        self.selection = NavItem::default();
        self.dirty = true;
    }

    /// Make `index` the active team. Its channels are unknown until
    /// [`NavIndex::set_channels`] is called.
    pub fn select_team(&mut self, index: usize) {
        self.active_team = Some(index);
        self.active_channel = None;
        self.channels.clear();
        self.selection = NavItem::Team(index);
        self.dirty = true;
    }

    pub fn set_channels(&mut self, channels: Vec<Channel>) {
        self.channels = channels;
        self.active_channel = None;
        self.dirty = true;
    }

    pub fn set_active_channel(&mut self, index: usize) {
        self.active_channel = Some(index);
    }

    /// Move the selection onto the team with `team_id`, if known.
    pub fn position_on_team(&mut self, team_id: &str) -> bool {
        match self.teams.iter().position(|team| team.id == team_id) {
            Some(index) => {
                self.selection = NavItem::Team(index);
                true
            }
            None => false,
        }
    }

    /// Move the selection onto the first channel or DM entry.
    pub fn select_first_conversation(&mut self) -> bool {
        let first = self
            .items()
            .iter()
            .find(|item| !matches!(item, NavItem::Team(_)))
            .copied();
        match first {
            Some(item) => {
                self.selection = item;
                true
            }
            None => false,
        }
    }

    /// Teams, then (once a team is active) regular channels, then DMs.
    pub fn items(&mut self) -> &[NavItem] {
        if self.dirty {
            let teams = (0..self.teams.len()).map(NavItem::Team);
            let mut items: Vec<NavItem> = teams.collect();
            if self.is_team_selected() {
                let indexed = || self.channels.iter().enumerate();
                items.extend(
                    indexed()
                        .filter(|(_, channel)| !channel.is_direct())
                        .map(|(i, _)| NavItem::Channel(i)),
                );
                items.extend(
                    indexed()
                        .filter(|(_, channel)| channel.is_direct())
                        .map(|(i, _)| NavItem::Dm(i)),
                );
            }
            self.items = items;
            self.dirty = false;
        }
        &self.items
    }

    pub fn current_position(&mut self) -> usize {
        let selection = self.selection;
        self.items()
            .iter()
            .position(|item| *item == selection)
            .unwrap_or(0)
    }

    /// Move the selection by `delta`, wrapping at both ends.
    pub fn navigate(&mut self, delta: isize) {
        let position = self.current_position() as isize;
        let items = self.items();
        if items.is_empty() {
            return;
        }
        let next = (position + delta).rem_euclid(items.len() as isize) as usize;
        if let Some(item) = items.get(next).copied() {
            self.selection = item;
        }
    }
}
