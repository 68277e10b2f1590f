//! Command-line front-end for vidgrab.
//!
//! `main.rs` parses arguments, builds a [`CliContext`] and dispatches to the
//! handlers in [`handlers`].

pub mod bootstrap;
pub mod commands;
pub mod handlers;
pub mod parser;
pub mod presentation;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::{Commands, DownloadOptions, WebOptions};
pub use parser::{Cli, ToolArgs};
