use clap::Parser;
use std::path::PathBuf;

/// Default location of the debug log, relative to the working directory
pub const DEFAULT_LOG_FILE: &str = "termunicator_debug.log";

/// A terminal chat client for Mattermost.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Mattermost server, either a bare host (https assumed) or a full URL
    #[arg(long, env = "MATTERMOST_HOST")]
    pub host: Option<String>,

    /// Personal access token. Takes precedence over --user/--pass
    #[arg(long, env = "MATTERMOST_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Login id (username or email) for password login
    #[arg(long)]
    pub user: Option<String>,

    /// Password for password login
    #[arg(long)]
    pub pass: Option<String>,

    /// Team to select in the sidebar after connecting
    #[arg(long = "teamid", value_name = "TEAM_ID")]
    pub team_id: Option<String>,

    /// Write debug logs to --log-file
    #[arg(long)]
    pub debug: bool,

    /// Where debug logs go
    #[arg(long, value_name = "PATH", default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,
}
