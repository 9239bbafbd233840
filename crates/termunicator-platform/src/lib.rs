//! Chat backend abstraction for termunicator.
//!
//! The view-model only ever talks to [`Platform`] and [`EventStream`]; the
//! Mattermost client in [`mattermost`] is one implementation of them.

pub mod error;
pub mod event;
pub mod mattermost;
pub mod platform;
pub mod types;

pub use error::{AuthMethod, PlatformError, Result};
pub use event::PlatformEvent;
pub use mattermost::{Credentials, MattermostConfig, MattermostPlatform};
pub use platform::{EventStream, Platform};
pub use types::{Channel, ChannelKind, Message, Team, User};
