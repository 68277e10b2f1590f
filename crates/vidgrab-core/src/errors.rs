//! Error types for request validation and download execution.
//!
//! `RequestError` covers everything that can be rejected before a process
//! is spawned. `DownloadError` covers failures of the external tool itself.
//! Both are plain data (no `std::io::Error` inside) so they can be cloned
//! into events and summaries.

use thiserror::Error;

/// Message sent to clients when the downloader could not be started.
pub const START_FAILED_MESSAGE: &str = "Failed to start download process.";

/// Message sent to clients when the downloader ran but did not produce a file.
pub const DOWNLOAD_FAILED_MESSAGE: &str = "Download failed. Check if the URL is valid.";

/// Errors raised while validating a download request.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    /// No URL, or a URL made only of whitespace.
    #[error("URL is required")]
    MissingUrl,

    /// The URL could not be parsed.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The URL parsed but uses a scheme other than http/https.
    #[error("Unsupported URL scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),

    /// The output container is not one of mp4, mkv, webm, mp3.
    #[error("Unsupported output format '{0}' (expected mp4, mkv, webm or mp3)")]
    UnsupportedContainer(String),

    /// An audio-only container was requested together with a video quality.
    #[error("Output format '{container}' requires audio quality, got '{quality}'")]
    IncompatibleContainer { quality: String, container: String },
}

/// Errors raised while running the external downloader.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DownloadError {
    /// The downloader executable (or interpreter) could not be located.
    #[error("Downloader not found: {0}")]
    ToolNotFound(String),

    /// The process could not be spawned.
    #[error("Failed to spawn downloader: {0}")]
    Spawn(String),

    /// Reading process output or touching the filesystem failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// The process exited unsuccessfully.
    #[error("Downloader exited with {}: {detail}", describe_exit(.code))]
    Failed { code: Option<i32>, detail: String },

    /// The process succeeded but never reported an output file.
    #[error("Downloader finished without reporting an output file")]
    NoOutputFile,

    /// The download was cancelled (client disconnected or user interrupt).
    #[error("Download cancelled")]
    Cancelled,
}

#[allow(clippy::ref_option)]
fn describe_exit(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| format!("code {c}"))
}

impl DownloadError {
    /// Client-facing text for this failure.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::ToolNotFound(_) | Self::Spawn(_) => START_FAILED_MESSAGE,
            _ => DOWNLOAD_FAILED_MESSAGE,
        }
    }

    /// Create an I/O error from a `std::io::Error`.
    #[must_use]
    pub fn from_io_error(err: &std::io::Error) -> Self {
        Self::Io(format!("{} ({})", err, err.kind()))
    }
}

impl From<std::io::Error> for DownloadError {
    fn from(err: std::io::Error) -> Self {
        Self::from_io_error(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_failures_use_start_message() {
        assert_eq!(
            DownloadError::Spawn("no such file".into()).user_message(),
            START_FAILED_MESSAGE
        );
        assert_eq!(
            DownloadError::ToolNotFound("yt-dlp".into()).user_message(),
            START_FAILED_MESSAGE
        );
    }

    #[test]
    fn process_failures_use_download_message() {
        let err = DownloadError::Failed {
            code: Some(1),
            detail: "ERROR: Unsupported URL".into(),
        };
        assert_eq!(err.user_message(), DOWNLOAD_FAILED_MESSAGE);
        assert_eq!(DownloadError::NoOutputFile.user_message(), DOWNLOAD_FAILED_MESSAGE);
    }

    #[test]
    fn failed_display_mentions_exit_code() {
        let err = DownloadError::Failed {
            code: Some(2),
            detail: "boom".into(),
        };
        assert_eq!(err.to_string(), "Downloader exited with code 2: boom");

        let err = DownloadError::Failed {
            code: None,
            detail: "killed".into(),
        };
        assert_eq!(err.to_string(), "Downloader exited with signal: killed");
    }

    #[test]
    fn missing_url_message_matches_http_contract() {
        assert_eq!(RequestError::MissingUrl.to_string(), "URL is required");
    }
}
