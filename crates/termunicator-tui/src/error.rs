//! Error types for the termunicator-tui crate

use std::io;
use thiserror::Error;

/// Result type alias for termunicator-tui operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for termunicator-tui
#[derive(Error, Debug)]
pub enum Error {
    /// Terminal I/O errors
    #[error("Terminal I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors from the chat backend
    #[error("Platform error: {0}")]
    Platform(#[from] termunicator_platform::PlatformError),

    /// Channel communication errors
    #[error("Channel error: {0}")]
    Channel(String),
}
