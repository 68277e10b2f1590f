//! yt-dlp invocation: argument building, output scanning, process supervision.

mod args;
mod runner;
mod scanner;

pub use args::{FormatProfile, build_args, output_template};
pub use runner::YtDlpDownloader;
pub use scanner::OutputScanner;
