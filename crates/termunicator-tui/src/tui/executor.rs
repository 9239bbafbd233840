//! Runs reducer requests against the platform off the event loop and feeds
//! the results back as inputs.

use std::sync::Arc;

use termunicator_platform::{EventStream, Platform};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};

use crate::tui::events::{Input, Request, SessionInfo};
use crate::tui::state::pagination::PAGE_SIZE;

type SharedStream = Arc<Mutex<Option<Box<dyn EventStream>>>>;

#[derive(Clone)]
pub struct RequestExecutor {
    platform: Arc<dyn Platform>,
    events: SharedStream,
    inputs: mpsc::Sender<Input>,
}

impl RequestExecutor {
    pub fn new(platform: Arc<dyn Platform>, inputs: mpsc::Sender<Input>) -> Self {
        Self {
            platform,
            events: Arc::new(Mutex::new(None)),
            inputs,
        }
    }

    /// Spawn the work for `request`. Results arrive on the input channel.
    /// `Quit` is handled by the runtime and ignored here.
    pub fn execute(&self, request: Request) {
        debug!(target: "tui.executor", ?request, "executing");
        let this = self.clone();
        match request {
            Request::Quit => {}
            Request::Connect => {
                tokio::spawn(async move {
                    let result = this.connect().await;
                    this.deliver(Input::Connected { result }).await;
                });
            }
            Request::ListenForEvent => {
                tokio::spawn(async move {
                    let event = {
                        let mut stream = this.events.lock().await;
                        match stream.as_mut() {
                            Some(stream) => stream.next_event().await,
                            None => None,
                        }
                    };
                    this.deliver(Input::Event(event)).await;
                });
            }
            Request::LoadChannels { team_id } => {
                tokio::spawn(async move {
                    let result = this.platform.list_channels(&team_id).await;
                    this.deliver(Input::ChannelsLoaded { team_id, result }).await;
                });
            }
            Request::FetchMessages { channel_id } => {
                tokio::spawn(async move {
                    let result = this.platform.get_messages(&channel_id, PAGE_SIZE).await;
                    this.deliver(Input::MessagesLoaded { channel_id, result })
                        .await;
                });
            }
            Request::FetchOlder {
                channel_id,
                before_id,
            } => {
                tokio::spawn(async move {
                    let result = this
                        .platform
                        .get_messages_before(&channel_id, &before_id, PAGE_SIZE)
                        .await;
                    this.deliver(Input::OlderMessagesLoaded {
                        channel_id,
                        before_id,
                        result,
                    })
                    .await;
                });
            }
            Request::FetchMessage { message_id } => {
                tokio::spawn(async move {
                    let result = this.platform.get_message(&message_id).await;
                    this.deliver(Input::MessageFetched { result }).await;
                });
            }
            Request::SendMessage { channel_id, text } => {
                tokio::spawn(async move {
                    let result = this.platform.send_message(&channel_id, &text).await;
                    this.deliver(Input::MessageSent { channel_id, result }).await;
                });
            }
            Request::ResolveUser { user_id } => {
                tokio::spawn(async move {
                    let result = this.platform.get_user(&user_id).await;
                    this.deliver(Input::UserResolved { user_id, result }).await;
                });
            }
        }
    }

    async fn connect(&self) -> termunicator_platform::Result<SessionInfo> {
        let user = self.platform.connect().await?;
        let teams = self.platform.list_teams().await?;
        let live_updates = match self.platform.subscribe().await {
            Ok(stream) => {
                *self.events.lock().await = Some(stream);
                true
            }
            Err(e) => {
                warn!(target: "tui.executor", "event stream unavailable: {}", e);
                false
            }
        };
        info!(target: "tui.executor", user = %user.username, teams = teams.len(), "session ready");
        Ok(SessionInfo {
            user,
            teams,
            live_updates,
        })
    }

    async fn deliver(&self, input: Input) {
        if self.inputs.send(input).await.is_err() {
            debug!(target: "tui.executor", "event loop gone, dropping result");
        }
    }

    /// Close the event stream and end the platform session.
    pub async fn shutdown(&self) {
        if let Ok(mut stream) = self.events.try_lock() {
            stream.take();
        }
        if let Err(e) = self.platform.disconnect().await {
            warn!(target: "tui.executor", "disconnect failed: {}", e);
        }
    }
}
