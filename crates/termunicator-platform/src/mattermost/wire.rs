//! Mattermost REST v4 / websocket payloads and their conversion into
//! backend-neutral types.

use std::collections::HashMap;

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PlatformError, Result};
use crate::event::PlatformEvent;
use crate::types::{Channel, ChannelKind, Message, Team, User};

#[derive(Debug, Deserialize)]
pub(crate) struct WirePost {
    pub id: String,
    #[serde(default)]
    pub create_at: i64,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub root_id: String,
    #[serde(default)]
    pub message: String,
}

impl From<WirePost> for Message {
    fn from(post: WirePost) -> Self {
        Message {
            id: post.id,
            channel_id: post.channel_id,
            sender_id: post.user_id,
            text: post.message,
            created_at: DateTime::from_timestamp_millis(post.create_at).unwrap_or_default(),
            thread_root_id: (!post.root_id.is_empty()).then_some(post.root_id),
        }
    }
}

/// `GET /channels/{id}/posts` response. `order` lists ids newest first.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct WirePostList {
    #[serde(default)]
    pub order: Vec<String>,
    #[serde(default)]
    pub posts: HashMap<String, WirePost>,
}

impl WirePostList {
    /// Messages oldest first, following the server's `order`.
    pub fn into_messages(mut self) -> Vec<Message> {
        self.order
            .iter()
            .rev()
            .filter_map(|id| self.posts.remove(id))
            .map(Message::from)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireTeam {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
}

impl From<WireTeam> for Team {
    fn from(team: WireTeam) -> Self {
        Team {
            id: team.id,
            name: team.name,
            display_name: team.display_name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireChannel {
    pub id: String,
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(rename = "type", default)]
    pub channel_type: String,
}

impl From<WireChannel> for Channel {
    fn from(channel: WireChannel) -> Self {
        let kind = match channel.channel_type.as_str() {
            "P" => ChannelKind::Private,
            "D" => ChannelKind::Direct,
            "G" => ChannelKind::Group,
            _ => ChannelKind::Public,
        };
        Channel {
            id: channel.id,
            team_id: channel.team_id,
            name: channel.name,
            display_name: channel.display_name,
            kind,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireUser {
    pub id: String,
    #[serde(default)]
    pub username: String,
}

impl From<WireUser> for User {
    fn from(user: WireUser) -> Self {
        User {
            id: user.id,
            username: user.username,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub login_id: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreatePost<'a> {
    pub channel_id: &'a str,
    pub message: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
struct WireBroadcast {
    #[serde(default)]
    channel_id: String,
    #[serde(default)]
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct WireEvent {
    event: String,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    broadcast: WireBroadcast,
}

fn str_field(data: &Value, key: &str) -> String {
    data.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Posts and channels travel as JSON documents embedded in a string field.
fn embedded_id(data: &Value, key: &str) -> Result<String> {
    let raw = data
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| PlatformError::InvalidEvent(format!("missing '{key}' field")))?;
    let embedded: Value = serde_json::from_str(raw)?;
    embedded
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| PlatformError::InvalidEvent(format!("'{key}' has no id")))
}

/// Decode one websocket text frame.
///
/// Returns `Ok(None)` for frames that are not events (replies to our own
/// requests such as the authentication challenge).
pub(crate) fn decode_frame(text: &str) -> Result<Option<PlatformEvent>> {
    let value: Value = serde_json::from_str(text)?;
    if value.get("event").is_none() {
        return Ok(None);
    }
    let event: WireEvent = serde_json::from_value(value)?;
    let data = &event.data;
    let broadcast = &event.broadcast;

    let decoded = match event.event.as_str() {
        "posted" => {
            let raw = data
                .get("post")
                .and_then(Value::as_str)
                .ok_or_else(|| PlatformError::InvalidEvent("posted without post".to_string()))?;
            let post: WirePost = serde_json::from_str(raw)?;
            PlatformEvent::MessagePosted {
                message_id: post.id,
                channel_id: (!post.channel_id.is_empty()).then_some(post.channel_id),
            }
        }
        "post_edited" => PlatformEvent::MessageUpdated {
            message_id: embedded_id(data, "post")?,
        },
        "post_deleted" => PlatformEvent::MessageDeleted {
            message_id: embedded_id(data, "post")?,
        },
        "status_change" => PlatformEvent::UserStatusChanged {
            user_id: str_field(data, "user_id"),
            status: str_field(data, "status"),
        },
        "typing" => PlatformEvent::UserTyping {
            user_id: str_field(data, "user_id"),
            channel_id: broadcast.channel_id.clone(),
        },
        "channel_created" => PlatformEvent::ChannelCreated {
            channel_id: str_field(data, "channel_id"),
        },
        "channel_updated" => PlatformEvent::ChannelUpdated {
            channel_id: embedded_id(data, "channel")
                .unwrap_or_else(|_| broadcast.channel_id.clone()),
        },
        "channel_deleted" => PlatformEvent::ChannelDeleted {
            channel_id: str_field(data, "channel_id"),
        },
        "user_added" => PlatformEvent::UserJoinedChannel {
            user_id: str_field(data, "user_id"),
            channel_id: broadcast.channel_id.clone(),
        },
        "user_removed" => {
            let mut channel_id = str_field(data, "channel_id");
            if channel_id.is_empty() {
                channel_id.clone_from(&broadcast.channel_id);
            }
            let mut user_id = str_field(data, "user_id");
            if user_id.is_empty() {
                user_id.clone_from(&broadcast.user_id);
            }
            PlatformEvent::UserLeftChannel {
                user_id,
                channel_id,
            }
        }
        "hello" => PlatformEvent::ConnectionStateChanged { connected: true },
        other => PlatformEvent::Other {
            kind: other.to_string(),
        },
    };
    Ok(Some(decoded))
}
