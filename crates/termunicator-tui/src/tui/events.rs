//! Inputs consumed by the reducer and the requests it emits.

use termunicator_platform::{Channel, Message, PlatformEvent, Result, Team, User};

/// Abstract keys; the runtime maps terminal key events onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    PageUp,
    PageDown,
    Select,
    Enter,
    Newline,
    Backspace,
    Escape,
    ToggleFocus,
    Quit,
    Char(char),
}

/// What a successful connect yields.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub user: User,
    pub teams: Vec<Team>,
    /// Whether the event stream could be opened.
    pub live_updates: bool,
}

#[derive(Debug)]
pub enum Input {
    Key(Key),
    Paste(String),
    Resize {
        width: u16,
        height: u16,
    },
    Tick,
    Connected {
        result: Result<SessionInfo>,
    },
    ChannelsLoaded {
        team_id: String,
        result: Result<Vec<Channel>>,
    },
    MessagesLoaded {
        channel_id: String,
        result: Result<Vec<Message>>,
    },
    OlderMessagesLoaded {
        channel_id: String,
        before_id: String,
        result: Result<Vec<Message>>,
    },
    MessageFetched {
        result: Result<Message>,
    },
    MessageSent {
        channel_id: String,
        result: Result<Message>,
    },
    UserResolved {
        user_id: String,
        result: Result<User>,
    },
    /// `None` once the event stream has closed.
    Event(Option<Result<PlatformEvent>>),
}

/// Side effects for the runtime to carry out off-loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Connect,
    ListenForEvent,
    LoadChannels { team_id: String },
    FetchMessages { channel_id: String },
    FetchOlder { channel_id: String, before_id: String },
    FetchMessage { message_id: String },
    SendMessage { channel_id: String, text: String },
    ResolveUser { user_id: String },
    Quit,
}
