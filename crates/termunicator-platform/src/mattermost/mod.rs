//! Mattermost backend: REST v4 for requests, websocket for live events.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{AuthMethod, PlatformError, Result};
use crate::platform::{EventStream, Platform};
use crate::types::{Channel, Message, Team, User};

mod websocket;
mod wire;

use websocket::MattermostEventStream;
use wire::{
    ApiErrorBody, CreatePost, LoginRequest, WireChannel, WirePost, WirePostList, WireTeam,
    WireUser,
};

/// Header carrying the session token after a password login.
const TOKEN_HEADER: &str = "Token";
/// How much of a rejected token is echoed back in the error.
const TOKEN_HINT_LEN: usize = 10;

#[derive(Debug, Clone)]
pub enum Credentials {
    Token(String),
    Password { login_id: String, password: String },
}

impl Credentials {
    fn method(&self) -> AuthMethod {
        match self {
            Credentials::Token(_) => AuthMethod::Token,
            Credentials::Password { .. } => AuthMethod::Password,
        }
    }

    /// What to show the user when the server rejects these credentials.
    fn identity(&self) -> String {
        match self {
            Credentials::Token(token) => token.chars().take(TOKEN_HINT_LEN).collect(),
            Credentials::Password { login_id, .. } => login_id.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MattermostConfig {
    /// Base URL including scheme, without a trailing slash
    pub server_url: String,
    pub credentials: Credentials,
}

impl MattermostConfig {
    /// Build a config from a host as typed by the user. A bare host gets
    /// `https://`; an explicit scheme is kept so local `http://` servers work.
    pub fn new(host: &str, credentials: Credentials) -> Self {
        let host = host.trim().trim_end_matches('/');
        let server_url = if host.contains("://") {
            host.to_string()
        } else {
            format!("https://{host}")
        };
        Self {
            server_url,
            credentials,
        }
    }

    fn websocket_url(&self) -> String {
        let base = if let Some(rest) = self.server_url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = self.server_url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            self.server_url.clone()
        };
        format!("{base}/api/v4/websocket")
    }
}

#[derive(Debug, Clone)]
struct Session {
    token: String,
    user: User,
}

pub struct MattermostPlatform {
    config: MattermostConfig,
    http: Client,
    session: RwLock<Option<Session>>,
}

impl MattermostPlatform {
    pub fn new(config: MattermostConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("termunicator/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            config,
            http,
            session: RwLock::new(None),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.config.server_url
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v4{}", self.config.server_url, path)
    }

    async fn token(&self) -> Result<String> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|session| session.token.clone())
            .ok_or(PlatformError::NotConnected)
    }

    async fn check(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(PlatformError::Unauthorized {
                method: self.config.credentials.method(),
                identity: self.config.credentials.identity(),
            });
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|err| err.message)
            .unwrap_or(body);
        Err(PlatformError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let token = self.token().await?;
        let response = request.bearer_auth(token).send().await?;
        let response = self.check(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send_json(self.http.get(self.api_url(path))).await
    }

    async fn login(&self) -> Result<Session> {
        match &self.config.credentials {
            Credentials::Token(token) => {
                let response = self
                    .http
                    .get(self.api_url("/users/me"))
                    .bearer_auth(token)
                    .send()
                    .await?;
                let user: WireUser = self.check(response).await?.json().await?;
                Ok(Session {
                    token: token.clone(),
                    user: user.into(),
                })
            }
            Credentials::Password { login_id, password } => {
                let response = self
                    .http
                    .post(self.api_url("/users/login"))
                    .json(&LoginRequest { login_id, password })
                    .send()
                    .await?;
                let response = self.check(response).await?;
                let token = response
                    .headers()
                    .get(TOKEN_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string)
                    .ok_or_else(|| PlatformError::Status {
                        status: response.status().as_u16(),
                        message: "login response carried no session token".to_string(),
                    })?;
                let user: WireUser = response.json().await?;
                Ok(Session {
                    token,
                    user: user.into(),
                })
            }
        }
    }
}

#[async_trait]
impl Platform for MattermostPlatform {
    async fn connect(&self) -> Result<User> {
        info!(target: "platform.mattermost", server = %self.config.server_url, "Connecting");
        let session = self.login().await?;
        let user = session.user.clone();
        *self.session.write().await = Some(session);
        info!(target: "platform.mattermost", user = %user.username, "Connected");
        Ok(user)
    }

    async fn disconnect(&self) -> Result<()> {
        let Some(session) = self.session.write().await.take() else {
            return Ok(());
        };
        let result = self
            .http
            .post(self.api_url("/users/logout"))
            .bearer_auth(&session.token)
            .send()
            .await;
        if let Err(err) = result {
            warn!(target: "platform.mattermost", "Logout failed: {}", err);
        }
        Ok(())
    }

    async fn list_teams(&self) -> Result<Vec<Team>> {
        let teams: Vec<WireTeam> = self.get_json("/users/me/teams").await?;
        Ok(teams.into_iter().map(Team::from).collect())
    }

    async fn list_channels(&self, team_id: &str) -> Result<Vec<Channel>> {
        let channels: Vec<WireChannel> = self
            .get_json(&format!("/users/me/teams/{team_id}/channels"))
            .await?;
        Ok(channels.into_iter().map(Channel::from).collect())
    }

    async fn get_messages(&self, channel_id: &str, limit: usize) -> Result<Vec<Message>> {
        let list: WirePostList = self
            .get_json(&format!("/channels/{channel_id}/posts?per_page={limit}"))
            .await?;
        let messages = list.into_messages();
        debug!(target: "platform.mattermost", channel_id, count = messages.len(), "Fetched messages");
        Ok(messages)
    }

    async fn get_messages_before(
        &self,
        channel_id: &str,
        before_id: &str,
        limit: usize,
    ) -> Result<Vec<Message>> {
        let list: WirePostList = self
            .get_json(&format!(
                "/channels/{channel_id}/posts?before={before_id}&per_page={limit}"
            ))
            .await?;
        let messages = list.into_messages();
        debug!(
            target: "platform.mattermost",
            channel_id,
            before_id,
            count = messages.len(),
            "Fetched older messages"
        );
        Ok(messages)
    }

    async fn get_message(&self, message_id: &str) -> Result<Message> {
        let post: WirePost = self.get_json(&format!("/posts/{message_id}")).await?;
        Ok(post.into())
    }

    async fn get_user(&self, user_id: &str) -> Result<User> {
        let user: WireUser = self.get_json(&format!("/users/{user_id}")).await?;
        Ok(user.into())
    }

    async fn send_message(&self, channel_id: &str, text: &str) -> Result<Message> {
        let request = self.http.post(self.api_url("/posts")).json(&CreatePost {
            channel_id,
            message: text,
        });
        let post: WirePost = self.send_json(request).await?;
        Ok(post.into())
    }

    async fn subscribe(&self) -> Result<Box<dyn EventStream>> {
        let token = self.token().await?;
        let stream = MattermostEventStream::connect(&self.config.websocket_url(), &token).await?;
        Ok(Box::new(stream))
    }
}
