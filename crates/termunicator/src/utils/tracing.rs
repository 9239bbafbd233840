use std::io;
use std::path::Path;

use tracing_appender::rolling;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Filter used with `--debug` when RUST_LOG is not set
const DEBUG_FILTER: &str = "debug";

/// Initialize a file-only tracing subscriber writing to `log_file`.
///
/// The terminal belongs to the TUI, so nothing is ever written to stdout or
/// stderr. The filter comes from RUST_LOG, falling back to debug level.
pub fn init_tracing(log_file: &Path) -> io::Result<()> {
    let directory = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    let file_name = log_file
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "log file has no name"))?;
    std::fs::create_dir_all(&directory)?;

    let file_appender = rolling::never(&directory, file_name);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEBUG_FILTER));

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::Layer::new()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_span_events(FmtSpan::CLOSE)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter);

    tracing::subscriber::set_global_default(subscriber).map_err(io::Error::other)?;

    tracing::debug!(
        target: "termunicator::utils::tracing",
        path = %log_file.display(),
        "Tracing initialized with file output"
    );
    Ok(())
}
