use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use super::wire::decode_frame;
use crate::error::Result;
use crate::event::PlatformEvent;
use crate::platform::EventStream;

pub(crate) struct MattermostEventStream {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl MattermostEventStream {
    pub(crate) async fn connect(url: &str, token: &str) -> Result<Self> {
        debug!(target: "platform.websocket", url, "Opening event stream");
        let (mut socket, _) = connect_async(url).await?;
        let challenge = json!({
            "seq": 1,
            "action": "authentication_challenge",
            "data": { "token": token },
        });
        socket.send(WsMessage::Text(challenge.to_string())).await?;
        info!(target: "platform.websocket", "Event stream authenticated");
        Ok(Self { socket })
    }
}

#[async_trait]
impl EventStream for MattermostEventStream {
    async fn next_event(&mut self) -> Option<Result<PlatformEvent>> {
        loop {
            match self.socket.next().await? {
                Ok(WsMessage::Text(text)) => match decode_frame(&text) {
                    Ok(Some(event)) => return Some(Ok(event)),
                    Ok(None) => continue,
                    Err(err) => {
                        warn!(target: "platform.websocket", "Undecodable frame: {}", err);
                        return Some(Err(err));
                    }
                },
                Ok(WsMessage::Close(frame)) => {
                    info!(target: "platform.websocket", ?frame, "Event stream closed by server");
                    return None;
                }
                Ok(_) => continue,
                Err(err) => return Some(Err(err.into())),
            }
        }
    }
}
