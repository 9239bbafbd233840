pub mod args;
pub mod config;

pub use args::Cli;
pub use config::ConfigError;
