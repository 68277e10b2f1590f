//! Terminal output for download commands.

mod progress;

pub use progress::TerminalProgress;
