//! Downloader settings.
//!
//! The flags here are configuration, not design: defaults mirror what works
//! against current yt-dlp releases and every value can be overridden by the
//! composition root.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::process::Command;

#[cfg(target_os = "windows")]
pub(crate) const PYTHON_CANDIDATES: &[&str] = &["python"];

#[cfg(not(target_os = "windows"))]
pub(crate) const PYTHON_CANDIDATES: &[&str] = &["python3", "python"];

/// Name of the standalone yt-dlp executable.
pub const YTDLP_BINARY: &str = "yt-dlp";

/// Python module name used with `python -m`.
pub const YTDLP_MODULE: &str = "yt_dlp";

/// How the downloader is started.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Launcher {
    /// `python -m yt_dlp ...`
    PythonModule { python: PathBuf },
    /// `yt-dlp ...`
    Binary { path: PathBuf },
}

impl Launcher {
    /// Executable that is spawned.
    #[must_use]
    pub fn program(&self) -> &Path {
        match self {
            Self::PythonModule { python } => python,
            Self::Binary { path } => path,
        }
    }

    /// Arguments placed before the yt-dlp options.
    #[must_use]
    pub fn prefix_args(&self) -> Vec<OsString> {
        match self {
            Self::PythonModule { .. } => vec!["-m".into(), YTDLP_MODULE.into()],
            Self::Binary { .. } => Vec::new(),
        }
    }

    /// A command with the program and prefix arguments applied.
    #[must_use]
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(self.program());
        cmd.args(self.prefix_args());
        cmd
    }

    /// Short description for logs and reports.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::PythonModule { python } => {
                format!("{} -m {YTDLP_MODULE}", python.display())
            }
            Self::Binary { path } => path.display().to_string(),
        }
    }
}

impl Default for Launcher {
    fn default() -> Self {
        Self::PythonModule {
            python: PathBuf::from(PYTHON_CANDIDATES[0]),
        }
    }
}

/// Retry, pacing and client identification flags.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkPolicy {
    pub retries: u32,
    pub fragment_retries: u32,
    pub extractor_retries: u32,
    /// Seconds to sleep between extraction requests.
    pub sleep_requests: f64,
    /// Minimum seconds to sleep before each download.
    pub sleep_interval: u32,
    /// Maximum seconds to sleep before each download.
    pub max_sleep_interval: u32,
    /// JavaScript runtime used for extractor challenges.
    pub js_runtime: Option<String>,
    /// Value passed to `--extractor-args`.
    pub extractor_args: Option<String>,
    pub user_agent: Option<String>,
    /// Extra HTTP headers as `Name:Value`.
    pub headers: Vec<String>,
}

impl Default for NetworkPolicy {
    fn default() -> Self {
        Self {
            retries: 10,
            fragment_retries: 10,
            extractor_retries: 10,
            sleep_requests: 1.5,
            sleep_interval: 3,
            max_sleep_interval: 6,
            js_runtime: Some("node".to_string()),
            extractor_args: Some(
                "youtube:player_client=android,web;formats=missing_pot".to_string(),
            ),
            user_agent: Some(
                "Mozilla/5.0 (Linux; Android 13; SM-G991B) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/121.0.0.0 Mobile Safari/537.36"
                    .to_string(),
            ),
            headers: vec![
                "Accept-Language:en-US,en;q=0.9".to_string(),
                "Accept:text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
                    .to_string(),
            ],
        }
    }
}

impl NetworkPolicy {
    /// No retries, no sleeping, no custom identification.
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            retries: 0,
            fragment_retries: 0,
            extractor_retries: 0,
            sleep_requests: 0.0,
            sleep_interval: 0,
            max_sleep_interval: 0,
            js_runtime: None,
            extractor_args: None,
            user_agent: None,
            headers: Vec::new(),
        }
    }
}

/// Everything the yt-dlp adapter needs besides the request itself.
#[derive(Clone, Debug)]
pub struct DownloaderSettings {
    pub launcher: Launcher,
    /// ffmpeg binary or directory; `None` lets yt-dlp search `PATH`.
    pub ffmpeg_location: Option<PathBuf>,
    /// Where output files are written.
    pub downloads_dir: PathBuf,
    /// Language requested when subtitles are enabled.
    pub subtitle_language: String,
    pub network: NetworkPolicy,
    /// Appended verbatim before the URL.
    pub extra_args: Vec<String>,
    /// Minimum interval between two `Downloading` progress events.
    pub progress_interval: Duration,
}

impl DownloaderSettings {
    /// Settings with defaults writing into `downloads_dir`.
    pub fn new(downloads_dir: impl Into<PathBuf>) -> Self {
        Self {
            launcher: Launcher::default(),
            ffmpeg_location: None,
            downloads_dir: downloads_dir.into(),
            subtitle_language: "en".to_string(),
            network: NetworkPolicy::default(),
            extra_args: Vec::new(),
            progress_interval: Duration::from_millis(250),
        }
    }

    #[must_use]
    pub fn with_launcher(mut self, launcher: Launcher) -> Self {
        self.launcher = launcher;
        self
    }

    #[must_use]
    pub fn with_ffmpeg_location(mut self, location: Option<PathBuf>) -> Self {
        self.ffmpeg_location = location;
        self
    }

    #[must_use]
    pub fn with_network(mut self, network: NetworkPolicy) -> Self {
        self.network = network;
        self
    }

    #[must_use]
    pub const fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn python_launcher_runs_module() {
        let launcher = Launcher::PythonModule {
            python: PathBuf::from("python3"),
        };
        assert_eq!(launcher.program(), Path::new("python3"));
        assert_eq!(launcher.prefix_args(), vec![OsString::from("-m"), OsString::from("yt_dlp")]);
        assert_eq!(launcher.describe(), "python3 -m yt_dlp");
    }

    #[test]
    fn binary_launcher_has_no_prefix() {
        let launcher = Launcher::Binary {
            path: PathBuf::from("/usr/bin/yt-dlp"),
        };
        assert!(launcher.prefix_args().is_empty());
    }

    #[test]
    fn default_network_policy_retries() {
        let policy = NetworkPolicy::default();
        assert_eq!(policy.retries, 10);
        assert_eq!(policy.headers.len(), 2);
        assert!(NetworkPolicy::minimal().user_agent.is_none());
    }
}
