//! CLI module containing argument parsing and configuration resolution

pub mod args;
pub mod config;

pub use args::Args;
pub use config::AppConfig;
