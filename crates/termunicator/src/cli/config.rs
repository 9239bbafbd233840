use dotenvy::dotenv;
use termunicator_platform::{Credentials, MattermostConfig};
use termunicator_tui::SessionOptions;
use thiserror::Error;

use super::Cli;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no Mattermost host given: pass --host or set MATTERMOST_HOST")]
    MissingHost,

    #[error(
        "no credentials given: pass --token (or set MATTERMOST_TOKEN), or both --user and --pass"
    )]
    MissingCredentials,
}

/// Load a `.env` file from the working directory if there is one.
pub fn load_env() {
    dotenv().ok();
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

impl Cli {
    /// Server and credentials for the Mattermost client. A token wins over
    /// a user/password pair when both are present.
    pub fn platform_config(&self) -> Result<MattermostConfig, ConfigError> {
        let host = non_empty(self.host.as_ref()).ok_or(ConfigError::MissingHost)?;
        let credentials = if let Some(token) = non_empty(self.token.as_ref()) {
            Credentials::Token(token.to_string())
        } else {
            match (non_empty(self.user.as_ref()), self.pass.as_ref()) {
                (Some(login_id), Some(password)) if !password.is_empty() => {
                    Credentials::Password {
                        login_id: login_id.to_string(),
                        password: password.clone(),
                    }
                }
                _ => return Err(ConfigError::MissingCredentials),
            }
        };
        Ok(MattermostConfig::new(host, credentials))
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            team_id: non_empty(self.team_id.as_ref()).map(str::to_string),
        }
    }

    /// Logging is on with --debug or whenever RUST_LOG is set.
    pub fn logging_enabled(&self) -> bool {
        self.debug || std::env::var_os("RUST_LOG").is_some()
    }
}
