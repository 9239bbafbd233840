use std::sync::Arc;

use clap::Parser;
use eyre::Result;
use termunicator::cli::{Cli, config};
use termunicator_platform::MattermostPlatform;
use termunicator_tui::tui::{self, setup_panic_hook};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    config::load_env();
    let cli = Cli::parse();

    if cli.logging_enabled() {
        termunicator::utils::tracing::init_tracing(&cli.log_file)?;
    }

    // Fail before the terminal is taken over
    let platform_config = cli.platform_config()?;
    let options = cli.session_options();
    info!(
        target: "termunicator",
        server = %platform_config.server_url,
        team_id = ?options.team_id,
        "starting"
    );
    let platform = Arc::new(MattermostPlatform::new(platform_config)?);

    setup_signal_handlers().await;
    setup_panic_hook();

    tui::run_tui(platform, options).await?;
    info!(target: "termunicator", "exited cleanly");
    Ok(())
}

async fn setup_signal_handlers() {
    #[cfg(not(windows))]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let _sigterm_task = tokio::spawn(async move {
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(signal) => signal,
                Err(error) => {
                    warn!(error = %error, "Failed to set up SIGTERM handler");
                    return;
                }
            };
            sigterm.recv().await;

            tui::terminal::cleanup();
            std::process::exit(0);
        });

        let _sigint_task = tokio::spawn(async move {
            let mut sigint = match signal(SignalKind::interrupt()) {
                Ok(signal) => signal,
                Err(error) => {
                    warn!(error = %error, "Failed to set up SIGINT handler");
                    return;
                }
            };
            sigint.recv().await;

            tui::terminal::cleanup();
            std::process::exit(130);
        });
    }

    #[cfg(windows)]
    {
        let _ctrl_c_task = tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            tui::terminal::cleanup();
            std::process::exit(130);
        });
    }
}
