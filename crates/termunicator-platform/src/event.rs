//! Typed notifications from the backend event stream.

/// A server-pushed notification.
///
/// Only [`PlatformEvent::MessagePosted`] requires action from the view-model;
/// the rest are decoded so they can be logged and acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformEvent {
    MessagePosted {
        message_id: String,
        channel_id: Option<String>,
    },
    MessageUpdated {
        message_id: String,
    },
    MessageDeleted {
        message_id: String,
    },
    UserStatusChanged {
        user_id: String,
        status: String,
    },
    UserTyping {
        user_id: String,
        channel_id: String,
    },
    ChannelCreated {
        channel_id: String,
    },
    ChannelUpdated {
        channel_id: String,
    },
    ChannelDeleted {
        channel_id: String,
    },
    UserJoinedChannel {
        user_id: String,
        channel_id: String,
    },
    UserLeftChannel {
        user_id: String,
        channel_id: String,
    },
    ConnectionStateChanged {
        connected: bool,
    },
    Other {
        kind: String,
    },
}

impl PlatformEvent {
    pub fn kind(&self) -> &str {
        match self {
            PlatformEvent::MessagePosted { .. } => "message_posted",
            PlatformEvent::MessageUpdated { .. } => "message_updated",
            PlatformEvent::MessageDeleted { .. } => "message_deleted",
            PlatformEvent::UserStatusChanged { .. } => "user_status_changed",
            PlatformEvent::UserTyping { .. } => "user_typing",
            PlatformEvent::ChannelCreated { .. } => "channel_created",
            PlatformEvent::ChannelUpdated { .. } => "channel_updated",
            PlatformEvent::ChannelDeleted { .. } => "channel_deleted",
            PlatformEvent::UserJoinedChannel { .. } => "user_joined_channel",
            PlatformEvent::UserLeftChannel { .. } => "user_left_channel",
            PlatformEvent::ConnectionStateChanged { .. } => "connection_state_changed",
            PlatformEvent::Other { kind } => kind,
        }
    }
}
