use async_trait::async_trait;

use crate::error::Result;
use crate::event::PlatformEvent;
use crate::types::{Channel, Message, Team, User};

/// A chat backend.
///
/// Message listings are ordered oldest first. `get_messages_before` returns
/// only messages strictly older than `before_id`, and an empty list once no
/// older history remains.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Authenticate and establish the session. Returns the logged-in user.
    async fn connect(&self) -> Result<User>;

    async fn disconnect(&self) -> Result<()>;

    async fn list_teams(&self) -> Result<Vec<Team>>;

    async fn list_channels(&self, team_id: &str) -> Result<Vec<Channel>>;

    async fn get_messages(&self, channel_id: &str, limit: usize) -> Result<Vec<Message>>;

    async fn get_messages_before(
        &self,
        channel_id: &str,
        before_id: &str,
        limit: usize,
    ) -> Result<Vec<Message>>;

    async fn get_message(&self, message_id: &str) -> Result<Message>;

    async fn get_user(&self, user_id: &str) -> Result<User>;

    async fn send_message(&self, channel_id: &str, text: &str) -> Result<Message>;

    /// Open the server event stream. Requires a connected session.
    async fn subscribe(&self) -> Result<Box<dyn EventStream>>;
}

/// A stream of server notifications.
#[async_trait]
pub trait EventStream: Send {
    /// Wait for the next event. `None` means the stream is closed for good.
    async fn next_event(&mut self) -> Option<Result<PlatformEvent>>;
}
