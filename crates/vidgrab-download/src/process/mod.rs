//! Child process plumbing shared by the downloader and the tool probe.

mod lines;
mod shutdown;

pub use lines::{OutputLine, StreamKind, spawn_line_reader};
pub use shutdown::shutdown_child;
