//! The reducer: applies one [`Input`] at a time to the chat model and
//! returns the follow-up [`Request`]s for the runtime to execute.

use std::collections::{HashMap, HashSet};

use termunicator_platform::{Message, PlatformEvent, User};
use tracing::{debug, info, warn};

use crate::tui::events::{Input, Key, Request, SessionInfo};
use crate::tui::state::{BatchOutcome, Conversation, InputBuffer, NavIndex, NavItem, Viewport};

/// Ids shorter than a username are shown truncated to this many chars.
pub const USER_ID_FALLBACK_LEN: usize = 8;

/// Startup options that shape the session.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Team to put the sidebar selection on after connecting.
    pub team_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Sidebar,
    Main,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connection {
    Connecting,
    Connected(User),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub level: StatusLevel,
    pub text: String,
}

/// Everything the UI shows, owned by the single event loop.
#[derive(Debug)]
pub struct ChatModel {
    options: SessionOptions,
    connection: Connection,
    focus: Focus,
    nav: NavIndex,
    conversation: Option<Conversation>,
    users: HashMap<String, User>,
    /// Users already asked for, resolved or not
    requested_users: HashSet<String>,
    input: InputBuffer,
    cursor_visible: bool,
    status: Option<Status>,
    viewport: Viewport,
    size: (u16, u16),
    live_updates: bool,
    should_quit: bool,
}

impl ChatModel {
    pub fn new(options: SessionOptions, size: (u16, u16)) -> Self {
        Self {
            options,
            connection: Connection::Connecting,
            focus: Focus::Sidebar,
            nav: NavIndex::new(),
            conversation: None,
            users: HashMap::new(),
            requested_users: HashSet::new(),
            input: InputBuffer::new(),
            cursor_visible: true,
            status: None,
            viewport: Viewport::from_terminal_height(size.1),
            size,
            live_updates: false,
            should_quit: false,
        }
    }

    /// Requests to issue before any input arrives.
    pub fn init(&self) -> Vec<Request> {
        vec![Request::Connect]
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn nav(&self) -> &NavIndex {
        &self.nav
    }

    pub fn nav_mut(&mut self) -> &mut NavIndex {
        &mut self.nav
    }

    pub fn conversation(&self) -> Option<&Conversation> {
        self.conversation.as_ref()
    }

    pub fn conversation_mut(&mut self) -> Option<&mut Conversation> {
        self.conversation.as_mut()
    }

    pub fn input(&self) -> &InputBuffer {
        &self.input
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    pub fn live_updates(&self) -> bool {
        self.live_updates
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn active_channel_id(&self) -> Option<&str> {
        self.conversation.as_ref().map(Conversation::channel_id)
    }

    fn is_connected(&self) -> bool {
        matches!(self.connection, Connection::Connected(_))
    }

    fn set_status(&mut self, level: StatusLevel, text: impl Into<String>) {
        let text = text.into();
        match level {
            StatusLevel::Error => warn!(target: "tui.update", "status: {}", text),
            _ => debug!(target: "tui.update", "status: {}", text),
        }
        self.status = Some(Status { level, text });
    }

    /// Display name for a sender id.
    pub fn display_name(&self, user_id: &str) -> String {
        if user_id.is_empty() {
            return "unknown".to_string();
        }
        match self.users.get(user_id) {
            Some(user) if !user.username.is_empty() => user.username.clone(),
            _ => user_id.chars().take(USER_ID_FALLBACK_LEN).collect(),
        }
    }

    fn resolve_senders<'a>(
        &mut self,
        messages: impl IntoIterator<Item = &'a Message>,
    ) -> Vec<Request> {
        let mut requests = Vec::new();
        for message in messages {
            let id = &message.sender_id;
            if id.is_empty() || self.users.contains_key(id) {
                continue;
            }
            if self.requested_users.insert(id.clone()) {
                requests.push(Request::ResolveUser {
                    user_id: id.clone(),
                });
            }
        }
        requests
    }

    /// Apply one input. The single entry point for state changes.
    pub fn update(&mut self, input: Input) -> Vec<Request> {
        match input {
            Input::Key(key) => self.on_key(key),
            Input::Paste(text) => {
                if self.focus == Focus::Main && self.is_connected() {
                    self.input.insert_str(&text);
                    debug!(target: "tui.update", "pasted {} chars", text.len());
                }
                Vec::new()
            }
            Input::Resize { width, height } => {
                self.size = (width, height);
                self.viewport = Viewport::from_terminal_height(height);
                let viewport = self.viewport;
                if let Some(conversation) = &mut self.conversation {
                    conversation.resize(viewport);
                }
                Vec::new()
            }
            Input::Tick => {
                self.cursor_visible = !self.cursor_visible;
                Vec::new()
            }
            Input::Connected { result } => self.on_connected(result),
            Input::ChannelsLoaded { team_id, result } => self.on_channels(team_id, result),
            Input::MessagesLoaded { channel_id, result } => self.on_messages(channel_id, result),
            Input::OlderMessagesLoaded {
                channel_id,
                before_id,
                result,
            } => self.on_older_messages(channel_id, before_id, result),
            Input::MessageFetched { result } => match result {
                Ok(message) => self.on_live_message(message),
                Err(e) => {
                    self.set_status(StatusLevel::Error, format!("failed to fetch message: {e}"));
                    Vec::new()
                }
            },
            Input::MessageSent { channel_id, result } => match result {
                Ok(message) => {
                    debug!(target: "tui.update", %channel_id, message_id = %message.id, "message sent");
                    self.on_live_message(message)
                }
                Err(e) => {
                    self.set_status(StatusLevel::Error, format!("send failed: {e}"));
                    Vec::new()
                }
            },
            Input::UserResolved { user_id, result } => {
                match result {
                    Ok(user) => {
                        self.users.insert(user_id, user);
                    }
                    Err(e) => {
                        debug!(target: "tui.update", %user_id, "user lookup failed: {}", e);
                    }
                }
                Vec::new()
            }
            Input::Event(event) => self.on_event(event),
        }
    }

    fn on_connected(&mut self, result: termunicator_platform::Result<SessionInfo>) -> Vec<Request> {
        let info = match result {
            Ok(info) => info,
            Err(e) => {
                warn!(target: "tui.update", "connection failed: {}", e);
                self.connection = Connection::Failed(e.to_string());
                return Vec::new();
            }
        };

        info!(
            target: "tui.update",
            user = %info.user.username,
            teams = info.teams.len(),
            live = info.live_updates,
            "connected"
        );
        self.users.insert(info.user.id.clone(), info.user.clone());
        self.requested_users.insert(info.user.id.clone());
        self.connection = Connection::Connected(info.user);
        self.nav.set_teams(info.teams);
        self.live_updates = info.live_updates;

        if let Some(team_id) = self.options.team_id.clone() {
            if !self.nav.position_on_team(&team_id) {
                self.set_status(StatusLevel::Warn, format!("team {team_id} not found"));
            }
        }

        if self.live_updates {
            vec![Request::ListenForEvent]
        } else {
            self.set_status(StatusLevel::Warn, "live updates unavailable");
            Vec::new()
        }
    }

    fn on_key(&mut self, key: Key) -> Vec<Request> {
        if key == Key::Quit {
            self.should_quit = true;
            return vec![Request::Quit];
        }
        if !self.is_connected() {
            if key == Key::Enter && matches!(self.connection, Connection::Failed(_)) {
                info!(target: "tui.update", "retrying connection");
                self.connection = Connection::Connecting;
                return vec![Request::Connect];
            }
            return Vec::new();
        }
        if key == Key::ToggleFocus {
            self.focus = match self.focus {
                Focus::Sidebar => Focus::Main,
                Focus::Main => Focus::Sidebar,
            };
            return Vec::new();
        }
        match self.focus {
            Focus::Sidebar => self.on_sidebar_key(key),
            Focus::Main => self.on_main_key(key),
        }
    }

    fn on_sidebar_key(&mut self, key: Key) -> Vec<Request> {
        match key {
            Key::Up => self.nav.navigate(-1),
            Key::Down => self.nav.navigate(1),
            Key::Select | Key::Enter => return self.activate_selection(),
            _ => {}
        }
        Vec::new()
    }

    fn activate_selection(&mut self) -> Vec<Request> {
        match self.nav.selection() {
            NavItem::Team(index) => {
                let Some(team_id) = self.nav.team(index).map(|team| team.id.clone()) else {
                    return Vec::new();
                };
                info!(target: "tui.update", %team_id, "team selected");
                self.nav.select_team(index);
                self.conversation = None;
                self.input.clear();
                self.status = None;
                vec![Request::LoadChannels { team_id }]
            }
            NavItem::Channel(index) | NavItem::Dm(index) => {
                let Some(channel_id) = self.nav.channel(index).map(|c| c.id.clone()) else {
                    return Vec::new();
                };
                if self.active_channel_id() == Some(channel_id.as_str()) {
                    debug!(target: "tui.update", %channel_id, "channel already open");
                    self.focus = Focus::Main;
                    return Vec::new();
                }
                info!(target: "tui.update", %channel_id, "channel opened");
                self.nav.set_active_channel(index);
                self.conversation = Some(Conversation::new(channel_id.clone()));
                self.focus = Focus::Main;
                self.status = None;
                vec![Request::FetchMessages { channel_id }]
            }
        }
    }

    fn on_main_key(&mut self, key: Key) -> Vec<Request> {
        match key {
            Key::Enter => return self.send_input(),
            Key::Newline => self.input.insert_char('\n'),
            Key::Backspace => self.input.backspace(),
            Key::Select => self.input.insert_char(' '),
            Key::Char(c) => self.input.insert_char(c),
            Key::Up | Key::Down | Key::PageUp | Key::PageDown | Key::Escape => {
                return self.on_scroll_key(key);
            }
            Key::ToggleFocus | Key::Quit => {}
        }
        Vec::new()
    }

    fn on_scroll_key(&mut self, key: Key) -> Vec<Request> {
        let viewport = self.viewport;
        let Some(conversation) = self.conversation.as_mut() else {
            return Vec::new();
        };
        let anchor = match key {
            Key::Up => conversation.cursor_up(viewport),
            Key::PageUp => conversation.page_up(viewport),
            Key::Down => {
                conversation.cursor_down(viewport);
                None
            }
            Key::PageDown => {
                conversation.page_down(viewport);
                None
            }
            Key::Escape => {
                conversation.clear_cursor();
                None
            }
            _ => None,
        };
        match anchor {
            Some(before_id) => vec![Request::FetchOlder {
                channel_id: conversation.channel_id().to_string(),
                before_id,
            }],
            None => {
                self.show_history_notice();
                Vec::new()
            }
        }
    }

    fn send_input(&mut self) -> Vec<Request> {
        if self.input.is_empty() {
            return Vec::new();
        }
        let Some(channel_id) = self.active_channel_id().map(str::to_string) else {
            self.set_status(StatusLevel::Warn, "select a channel first");
            return Vec::new();
        };
        let text = self.input.take();
        vec![Request::SendMessage { channel_id, text }]
    }

    fn show_history_notice(&mut self) {
        let notice = self
            .conversation
            .as_mut()
            .and_then(Conversation::take_history_notice);
        if let Some(text) = notice {
            self.set_status(StatusLevel::Info, text);
        }
    }

    fn on_channels(
        &mut self,
        team_id: String,
        result: termunicator_platform::Result<Vec<termunicator_platform::Channel>>,
    ) -> Vec<Request> {
        let current = self.nav.active_team().map(|team| team.id.as_str());
        if current != Some(team_id.as_str()) {
            debug!(target: "tui.update", %team_id, ?current, "discarding channels for inactive team");
            return Vec::new();
        }
        match result {
            Ok(channels) => {
                debug!(target: "tui.update", %team_id, count = channels.len(), "channels loaded");
                let empty = channels.is_empty();
                self.nav.set_channels(channels);
                if empty {
                    self.set_status(StatusLevel::Warn, "no channels in this team");
                } else {
                    self.nav.select_first_conversation();
                }
            }
            Err(e) => self.set_status(StatusLevel::Error, format!("failed to load channels: {e}")),
        }
        Vec::new()
    }

    fn on_messages(
        &mut self,
        channel_id: String,
        result: termunicator_platform::Result<Vec<Message>>,
    ) -> Vec<Request> {
        if self.active_channel_id() != Some(channel_id.as_str()) {
            debug!(target: "tui.update", %channel_id, "discarding messages for inactive channel");
            return Vec::new();
        }
        if self.conversation.as_ref().is_some_and(Conversation::is_loaded) {
            debug!(target: "tui.update", %channel_id, "discarding repeated newest page");
            return Vec::new();
        }
        let messages = match result {
            Ok(messages) => messages,
            Err(e) => {
                self.set_status(StatusLevel::Error, format!("failed to load messages: {e}"));
                return Vec::new();
            }
        };

        let mut requests = self.resolve_senders(&messages);
        let anchor = self
            .conversation
            .as_mut()
            .and_then(|conversation| conversation.replace(messages));
        if let Some(before_id) = anchor {
            requests.push(Request::FetchOlder {
                channel_id,
                before_id,
            });
        }
        requests
    }

    fn on_older_messages(
        &mut self,
        channel_id: String,
        before_id: String,
        result: termunicator_platform::Result<Vec<Message>>,
    ) -> Vec<Request> {
        if self.active_channel_id() != Some(channel_id.as_str()) {
            debug!(target: "tui.update", %channel_id, %before_id, "discarding older messages for inactive channel");
            return Vec::new();
        }
        let viewport = self.viewport;

        let batch = match result {
            Ok(batch) => batch,
            Err(e) => {
                if let Some(conversation) = &mut self.conversation {
                    conversation.older_failed(&before_id);
                }
                self.set_status(
                    StatusLevel::Error,
                    format!("failed to load older messages: {e}"),
                );
                return Vec::new();
            }
        };

        let mut requests = self.resolve_senders(&batch);
        let Some(conversation) = self.conversation.as_mut() else {
            return requests;
        };
        match conversation.older_loaded(&before_id, batch, viewport) {
            BatchOutcome::Continue { anchor } => requests.push(Request::FetchOlder {
                channel_id,
                before_id: anchor,
            }),
            BatchOutcome::Exhausted | BatchOutcome::Stuck => self.show_history_notice(),
            BatchOutcome::Revealed { .. } | BatchOutcome::Discarded => {}
        }
        requests
    }

    fn on_live_message(&mut self, message: Message) -> Vec<Request> {
        if self.active_channel_id() != Some(message.channel_id.as_str()) {
            debug!(
                target: "tui.update",
                message_id = %message.id,
                channel_id = %message.channel_id,
                "message is not for the open conversation"
            );
            return Vec::new();
        }
        let requests = self.resolve_senders([&message]);
        let viewport = self.viewport;
        if let Some(conversation) = &mut self.conversation {
            conversation.append_if_new(message, viewport);
        }
        requests
    }

    fn on_event(
        &mut self,
        event: Option<termunicator_platform::Result<PlatformEvent>>,
    ) -> Vec<Request> {
        let event = match event {
            None => {
                info!(target: "tui.update", "event stream closed");
                self.live_updates = false;
                self.set_status(StatusLevel::Warn, "live updates stopped");
                return Vec::new();
            }
            Some(Err(e)) => {
                self.set_status(StatusLevel::Error, format!("event stream error: {e}"));
                return vec![Request::ListenForEvent];
            }
            Some(Ok(event)) => event,
        };

        let mut requests = Vec::with_capacity(2);
        match event {
            PlatformEvent::MessagePosted {
                message_id,
                channel_id: Some(channel_id),
            } if self.active_channel_id() != Some(channel_id.as_str()) => {
                debug!(target: "tui.update", %message_id, %channel_id, "post in another channel");
            }
            PlatformEvent::MessagePosted { message_id, .. } => {
                requests.push(Request::FetchMessage { message_id });
            }
            PlatformEvent::ConnectionStateChanged { connected: false } => {
                self.set_status(StatusLevel::Warn, "server connection lost");
            }
            other => debug!(target: "tui.update", kind = other.kind(), "ignoring event"),
        }
        requests.push(Request::ListenForEvent);
        requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use termunicator_platform::{Channel, ChannelKind, PlatformError, Team};

    fn user(id: &str, name: &str) -> User {
        User {
            id: id.to_string(),
            username: name.to_string(),
        }
    }

    fn message(id: &str, channel_id: &str, sender: &str, root: Option<&str>) -> Message {
        Message {
            id: id.to_string(),
            channel_id: channel_id.to_string(),
            sender_id: sender.to_string(),
            text: format!("text of {id}"),
            created_at: Utc::now(),
            thread_root_id: root.map(str::to_string),
        }
    }

    fn teams() -> Vec<Team> {
        ["alpha", "beta"]
            .iter()
            .map(|id| Team {
                id: (*id).to_string(),
                name: (*id).to_string(),
                display_name: id.to_uppercase(),
            })
            .collect()
    }

    fn channels() -> Vec<Channel> {
        vec![
            Channel {
                id: "town".to_string(),
                team_id: "alpha".to_string(),
                name: "town-square".to_string(),
                display_name: "Town Square".to_string(),
                kind: ChannelKind::Public,
            },
            Channel {
                id: "dm".to_string(),
                team_id: String::new(),
                name: "me__you".to_string(),
                display_name: "you".to_string(),
                kind: ChannelKind::Direct,
            },
        ]
    }

    fn connected(options: SessionOptions) -> ChatModel {
        let mut model = ChatModel::new(options, (80, 12));
        let requests = model.update(Input::Connected {
            result: Ok(SessionInfo {
                user: user("me", "me"),
                teams: teams(),
                live_updates: true,
            }),
        });
        assert_eq!(requests, vec![Request::ListenForEvent]);
        model
    }

    /// Select team `alpha` and open `town`.
    fn in_channel() -> ChatModel {
        let mut model = connected(SessionOptions::default());
        assert_eq!(
            model.update(Input::Key(Key::Select)),
            vec![Request::LoadChannels {
                team_id: "alpha".to_string()
            }]
        );
        model.update(Input::ChannelsLoaded {
            team_id: "alpha".to_string(),
            result: Ok(channels()),
        });
        assert_eq!(model.nav().selection(), NavItem::Channel(0));
        assert_eq!(
            model.update(Input::Key(Key::Select)),
            vec![Request::FetchMessages {
                channel_id: "town".to_string()
            }]
        );
        model
    }

    #[test]
    fn starts_by_connecting() {
        let model = ChatModel::new(SessionOptions::default(), (80, 24));
        assert_eq!(model.init(), vec![Request::Connect]);
        assert_eq!(model.connection(), &Connection::Connecting);
    }

    #[test]
    fn connection_failure_is_kept_for_display() {
        let mut model = ChatModel::new(SessionOptions::default(), (80, 24));
        let requests = model.update(Input::Connected {
            result: Err(PlatformError::NotConnected),
        });
        assert!(requests.is_empty());
        assert!(matches!(model.connection(), Connection::Failed(_)));
        assert!(model.update(Input::Key(Key::Down)).is_empty());
        assert_eq!(model.update(Input::Key(Key::Quit)), vec![Request::Quit]);
        assert!(model.should_quit());
    }

    #[test]
    fn enter_retries_failed_connection() {
        let mut model = ChatModel::new(SessionOptions::default(), (80, 24));
        model.update(Input::Connected {
            result: Err(PlatformError::NotConnected),
        });
        assert_eq!(model.update(Input::Key(Key::Enter)), vec![Request::Connect]);
        assert_eq!(model.connection(), &Connection::Connecting);
        // No second attempt while the first is outstanding
        assert!(model.update(Input::Key(Key::Enter)).is_empty());
    }

    #[test]
    fn reopening_active_channel_keeps_conversation() {
        let mut model = in_channel();
        let replies: Vec<Message> = (0..3)
            .map(|i| message(&format!("r{i}"), "town", "me", Some("root")))
            .collect();
        let first = model.update(Input::MessagesLoaded {
            channel_id: "town".to_string(),
            result: Ok(replies.clone()),
        });
        assert_eq!(
            first,
            vec![Request::FetchOlder {
                channel_id: "town".to_string(),
                before_id: "r0".to_string()
            }]
        );

        model.update(Input::Key(Key::ToggleFocus));
        assert!(model.update(Input::Key(Key::Select)).is_empty());
        assert_eq!(model.focus(), Focus::Main);

        // A late duplicate of the newest page must not restart pagination
        let second = model.update(Input::MessagesLoaded {
            channel_id: "town".to_string(),
            result: Ok(replies),
        });
        assert!(second.is_empty());
        let conversation = model.conversation().unwrap();
        assert_eq!(conversation.pagination().in_flight(), Some("r0"));
        assert_eq!(conversation.store().len(), 3);
    }

    #[test]
    fn only_first_newest_page_is_installed() {
        let mut model = in_channel();
        model.update(Input::MessagesLoaded {
            channel_id: "town".to_string(),
            result: Ok(vec![message("a", "town", "me", None)]),
        });
        model.update(Input::MessagesLoaded {
            channel_id: "town".to_string(),
            result: Ok(vec![message("b", "town", "me", None)]),
        });
        let ids: Vec<String> = model
            .conversation_mut()
            .unwrap()
            .visible()
            .iter()
            .map(|m| m.id.clone())
            .collect();
        assert_eq!(ids, vec!["a"]);
    }

    #[test]
    fn posts_in_other_channels_are_not_fetched() {
        let mut model = in_channel();
        let requests = model.update(Input::Event(Some(Ok(PlatformEvent::MessagePosted {
            message_id: "p1".to_string(),
            channel_id: Some("dm".to_string()),
        }))));
        assert_eq!(requests, vec![Request::ListenForEvent]);

        let requests = model.update(Input::Event(Some(Ok(PlatformEvent::MessagePosted {
            message_id: "p2".to_string(),
            channel_id: None,
        }))));
        assert_eq!(
            requests,
            vec![
                Request::FetchMessage {
                    message_id: "p2".to_string()
                },
                Request::ListenForEvent
            ]
        );
    }

    #[test]
    fn team_option_positions_selection() {
        let model = connected(SessionOptions {
            team_id: Some("beta".to_string()),
        });
        assert_eq!(model.nav().selection(), NavItem::Team(1));
    }

    #[test]
    fn opening_channel_moves_focus_to_main() {
        let model = in_channel();
        assert_eq!(model.focus(), Focus::Main);
        assert_eq!(
            model.conversation().map(Conversation::channel_id),
            Some("town")
        );
    }

    #[test]
    fn loaded_messages_request_unknown_senders_once() {
        let mut model = in_channel();
        let requests = model.update(Input::MessagesLoaded {
            channel_id: "town".to_string(),
            result: Ok(vec![
                message("m1", "town", "bob", None),
                message("m2", "town", "bob", None),
                message("m3", "town", "me", None),
            ]),
        });
        assert_eq!(
            requests,
            vec![Request::ResolveUser {
                user_id: "bob".to_string()
            }]
        );
        assert_eq!(model.display_name("bob"), "bob");
        assert_eq!(model.display_name("0123456789abcdef"), "01234567");
        assert_eq!(model.display_name(""), "unknown");

        model.update(Input::UserResolved {
            user_id: "bob".to_string(),
            result: Ok(user("bob", "robert")),
        });
        assert_eq!(model.display_name("bob"), "robert");
    }

    #[test]
    fn replies_only_first_page_fetches_older_once() {
        let mut model = in_channel();
        let replies: Vec<Message> = (0..10)
            .map(|i| message(&format!("r{i}"), "town", "me", Some("root")))
            .collect();

        let requests = model.update(Input::MessagesLoaded {
            channel_id: "town".to_string(),
            result: Ok(replies),
        });

        assert_eq!(
            requests,
            vec![Request::FetchOlder {
                channel_id: "town".to_string(),
                before_id: "r0".to_string()
            }]
        );
        assert!(model.update(Input::Key(Key::Up)).is_empty());
        assert!(model.update(Input::Key(Key::PageUp)).is_empty());
    }

    #[test]
    fn stale_results_are_discarded() {
        let mut model = in_channel();
        let requests = model.update(Input::MessagesLoaded {
            channel_id: "elsewhere".to_string(),
            result: Ok(vec![message("x", "elsewhere", "me", None)]),
        });
        assert!(requests.is_empty());
        assert_eq!(model.conversation().map(|c| c.store().len()), Some(0));

        model.update(Input::ChannelsLoaded {
            team_id: "beta".to_string(),
            result: Ok(Vec::new()),
        });
        assert_eq!(model.nav().channels().len(), 2);
    }

    #[test]
    fn exhausted_history_notice_is_shown() {
        let mut model = in_channel();
        model.update(Input::MessagesLoaded {
            channel_id: "town".to_string(),
            result: Ok(vec![message("m1", "town", "me", None)]),
        });
        model.update(Input::Key(Key::Up));
        let requests = model.update(Input::Key(Key::Up));
        assert_eq!(
            requests,
            vec![Request::FetchOlder {
                channel_id: "town".to_string(),
                before_id: "m1".to_string()
            }]
        );

        model.update(Input::OlderMessagesLoaded {
            channel_id: "town".to_string(),
            before_id: "m1".to_string(),
            result: Ok(Vec::new()),
        });
        let status = model.status().cloned();
        assert_eq!(
            status,
            Some(Status {
                level: StatusLevel::Info,
                text: "beginning of history".to_string()
            })
        );
        assert!(model.update(Input::Key(Key::Up)).is_empty());
    }

    #[test]
    fn enter_sends_and_clears_input() {
        let mut model = in_channel();
        for c in "hi".chars() {
            model.update(Input::Key(Key::Char(c)));
        }
        model.update(Input::Key(Key::Select));
        model.update(Input::Key(Key::Newline));
        model.update(Input::Key(Key::Char('x')));
        model.update(Input::Key(Key::Backspace));

        let requests = model.update(Input::Key(Key::Enter));

        assert_eq!(
            requests,
            vec![Request::SendMessage {
                channel_id: "town".to_string(),
                text: "hi \n".to_string()
            }]
        );
        assert!(model.input().is_empty());
        assert!(model.update(Input::Key(Key::Enter)).is_empty());
    }

    #[test]
    fn sent_and_posted_message_is_appended_once() {
        let mut model = in_channel();
        model.update(Input::MessagesLoaded {
            channel_id: "town".to_string(),
            result: Ok(Vec::new()),
        });
        model.update(Input::MessageSent {
            channel_id: "town".to_string(),
            result: Ok(message("new", "town", "me", None)),
        });
        let requests = model.update(Input::Event(Some(Ok(PlatformEvent::MessagePosted {
            message_id: "new".to_string(),
            channel_id: Some("town".to_string()),
        }))));
        assert_eq!(
            requests,
            vec![
                Request::FetchMessage {
                    message_id: "new".to_string()
                },
                Request::ListenForEvent
            ]
        );
        model.update(Input::MessageFetched {
            result: Ok(message("new", "town", "me", None)),
        });
        assert_eq!(model.conversation().map(|c| c.store().len()), Some(1));
    }

    #[test]
    fn closed_stream_stops_listening() {
        let mut model = in_channel();
        let other = model.update(Input::Event(Some(Ok(PlatformEvent::UserTyping {
            user_id: "bob".to_string(),
            channel_id: "town".to_string(),
        }))));
        assert_eq!(other, vec![Request::ListenForEvent]);
        assert!(model.update(Input::Event(None)).is_empty());
        assert!(!model.live_updates());
    }

    #[test]
    fn focus_toggle_and_tick() {
        let mut model = in_channel();
        model.update(Input::Key(Key::ToggleFocus));
        assert_eq!(model.focus(), Focus::Sidebar);
        let visible = model.cursor_visible();
        model.update(Input::Tick);
        assert_ne!(model.cursor_visible(), visible);
    }
}
