//! Download events - discriminated union pushed to clients.
//!
//! The wire shape is a flat JSON object tagged by `type`:
//!
//! ```json
//! {"type":"progress","stage":"Downloading","percent":31.5,"message":"45.0% of 10.00MiB at 1.00MiB/s"}
//! {"type":"warning","message":"WARNING: [youtube] ..."}
//! {"type":"complete","filename":"clip_best.mp4","url":"/downloads/clip_best.mp4"}
//! {"type":"error","message":"Download failed. Check if the URL is valid."}
//! ```

use serde::{Deserialize, Serialize};

/// Stage of a single download.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressStage {
    Starting,
    Downloading,
    Merging,
    Encoding,
    Complete,
}

impl ProgressStage {
    /// Display name, identical to the wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Starting => "Starting",
            Self::Downloading => "Downloading",
            Self::Merging => "Merging",
            Self::Encoding => "Encoding",
            Self::Complete => "Complete",
        }
    }
}

/// Single discriminated union for all download events.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DownloadEvent {
    /// Progress update. `percent` is always within `[0, 100]`.
    Progress {
        stage: ProgressStage,
        percent: f64,
        message: String,
    },

    /// Non-fatal warning printed by the downloader.
    Warning { message: String },

    /// The output file is ready.
    Complete {
        /// File name inside the downloads directory.
        filename: String,
        /// Public path the file is served under.
        url: String,
    },

    /// The download failed.
    Error { message: String },
}

impl DownloadEvent {
    /// Create a progress event, clamping `percent` to `[0, 100]`.
    pub fn progress(stage: ProgressStage, percent: f64, message: impl Into<String>) -> Self {
        Self::Progress {
            stage,
            percent: clamp_percent(percent),
            message: message.into(),
        }
    }

    /// Create a warning event.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::Warning {
            message: message.into(),
        }
    }

    /// Create a completion event.
    pub fn complete(filename: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Complete {
            filename: filename.into(),
            url: url.into(),
        }
    }

    /// Create an error event.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Whether no further events follow this one.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Error { .. })
    }

    /// Stage of a progress event.
    #[must_use]
    pub const fn stage(&self) -> Option<ProgressStage> {
        match self {
            Self::Progress { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Clamp to `[0, 100]`; NaN becomes 0.
#[must_use]
pub fn clamp_percent(percent: f64) -> f64 {
    if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0)
    }
}
