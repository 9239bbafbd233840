//! Error types for the platform crate

use thiserror::Error;

/// Result type alias for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;

/// How the session authenticates, used to tailor auth failure hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    Token,
    Password,
}

#[derive(Error, Debug)]
pub enum PlatformError {
    /// Transport-level failure (DNS, TLS, connection reset, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The server rejected our credentials
    #[error("{}", unauthorized_hint(.method, .identity))]
    Unauthorized { method: AuthMethod, identity: String },

    /// A payload could not be decoded
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Websocket failure on the event stream
    #[error("event stream error: {0}")]
    WebSocket(#[from] Box<tokio_tungstenite::tungstenite::Error>),

    /// An operation that needs a session was called before `connect`
    #[error("not connected")]
    NotConnected,

    /// An event arrived with a shape we could not interpret
    #[error("invalid event payload: {0}")]
    InvalidEvent(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for PlatformError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        PlatformError::WebSocket(Box::new(err))
    }
}

fn unauthorized_hint(method: &AuthMethod, identity: &str) -> String {
    match method {
        AuthMethod::Token => format!(
            "authentication failed: invalid token ({identity}...). \
             Check that it is a valid personal access token, that it has not been revoked, \
             and that you have access to the server"
        ),
        AuthMethod::Password => format!(
            "authentication failed: invalid username/password for '{identity}'. \
             Check that --user is your real email or username and that the account is not locked"
        ),
    }
}
