//! Terminal chat client UI: the message view-model, the reducer that drives
//! it, and the ratatui runtime around them.

pub mod error;
pub mod tui;

// Expose the main TUI entry point
pub use tui::Tui;

// Expose the run function and the view-model
pub use tui::update::{ChatModel, SessionOptions};
pub use tui::{run_tui, setup_panic_hook};
