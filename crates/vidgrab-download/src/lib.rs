//! yt-dlp adapter for vidgrab.
//!
//! - `settings` - launcher, ffmpeg location, network policy
//! - `ytdlp` - argument builder, output scanner, `YtDlpDownloader`
//! - `process` - child process plumbing (line readers, graceful shutdown)
//! - `probe` - executable discovery and version checks
//! - `throttle` - progress event rate limiting

pub mod probe;
pub mod process;
pub mod settings;
pub mod throttle;
pub mod ytdlp;

pub use probe::{ToolReport, ToolStatus, discover_launcher, probe_tools};
pub use settings::{DownloaderSettings, Launcher, NetworkPolicy};
pub use throttle::ProgressThrottle;
pub use ytdlp::{FormatProfile, OutputScanner, YtDlpDownloader, build_args, output_template};

// Re-export core types for convenience
pub use vidgrab_core::{CompletedDownload, DownloadError, DownloadEvent, MediaDownloader};
