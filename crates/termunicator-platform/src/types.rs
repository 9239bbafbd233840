//! Backend-neutral chat entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single chat message.
///
/// `thread_root_id` is set on thread replies and names the root post they
/// belong to. Root posts leave it `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub channel_id: String,
    pub sender_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_root_id: Option<String>,
}

impl Message {
    pub fn is_thread_reply(&self) -> bool {
        self.thread_root_id
            .as_deref()
            .is_some_and(|root| !root.is_empty())
    }

    /// Number of terminal lines the message occupies before width truncation.
    pub fn line_count(&self) -> usize {
        self.text.split('\n').count().max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub display_name: String,
}

impl Team {
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelKind {
    Public,
    Private,
    Direct,
    Group,
}

impl ChannelKind {
    /// Direct and group conversations are listed under DMs.
    pub fn is_direct(self) -> bool {
        matches!(self, ChannelKind::Direct | ChannelKind::Group)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub team_id: String,
    pub name: String,
    pub display_name: String,
    pub kind: ChannelKind,
}

impl Channel {
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }

    pub fn is_direct(&self) -> bool {
        self.kind.is_direct()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
}
