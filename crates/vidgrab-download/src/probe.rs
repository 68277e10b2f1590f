//! Executable discovery and version probing.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use serde::Serialize;
use tokio::process::Command;
use tokio::time::timeout;

use crate::settings::{DownloaderSettings, Launcher, PYTHON_CANDIDATES, YTDLP_BINARY};

const PROBE_TIMEOUT: Duration = Duration::from_secs(15);

/// Find a way to run yt-dlp: the standalone binary first, then python.
///
/// Python is not checked for the `yt_dlp` module here; [`probe_tools`] does
/// that by asking for the version.
pub fn discover_launcher() -> Option<Launcher> {
    if let Ok(path) = which::which(YTDLP_BINARY) {
        return Some(Launcher::Binary { path });
    }

    PYTHON_CANDIDATES
        .iter()
        .find_map(|candidate| which::which(candidate).ok())
        .map(|python| Launcher::PythonModule { python })
}

/// Result of probing one tool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ToolStatus {
    pub name: String,
    /// How the tool is invoked.
    pub location: String,
    /// First line of the tool's version output, if it ran.
    pub version: Option<String>,
    /// Why the probe failed.
    pub error: Option<String>,
}

impl ToolStatus {
    pub const fn is_available(&self) -> bool {
        self.version.is_some()
    }
}

/// Probe results for everything a download needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ToolReport {
    pub downloader: ToolStatus,
    pub ffmpeg: ToolStatus,
}

impl ToolReport {
    pub const fn all_available(&self) -> bool {
        self.downloader.is_available() && self.ffmpeg.is_available()
    }
}

/// Run the configured downloader and ffmpeg with their version flags.
pub async fn probe_tools(settings: &DownloaderSettings) -> ToolReport {
    let mut downloader_cmd = settings.launcher.command();
    downloader_cmd.arg("--version");
    let downloader = probe(
        "yt-dlp",
        settings.launcher.describe(),
        downloader_cmd,
    )
    .await;

    let ffmpeg_program = ffmpeg_program(settings.ffmpeg_location.as_deref());
    let mut ffmpeg_cmd = Command::new(&ffmpeg_program);
    ffmpeg_cmd.arg("-version");
    let ffmpeg = probe("ffmpeg", ffmpeg_program.display().to_string(), ffmpeg_cmd).await;

    ToolReport { downloader, ffmpeg }
}

/// ffmpeg executable for a configured location (file or directory).
fn ffmpeg_program(location: Option<&Path>) -> PathBuf {
    match location {
        Some(dir) if dir.is_dir() => dir.join(if cfg!(windows) { "ffmpeg.exe" } else { "ffmpeg" }),
        Some(file) => file.to_path_buf(),
        None => which::which("ffmpeg").unwrap_or_else(|_| PathBuf::from("ffmpeg")),
    }
}

async fn probe(name: &str, location: String, mut cmd: Command) -> ToolStatus {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let (version, error) = match timeout(PROBE_TIMEOUT, cmd.output()).await {
        Err(_) => (None, Some(format!("timed out after {}s", PROBE_TIMEOUT.as_secs()))),
        Ok(Err(e)) => (None, Some(e.to_string())),
        Ok(Ok(output)) if output.status.success() => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let first = stdout.lines().next().unwrap_or_default().trim().to_string();
            (Some(first), None)
        }
        Ok(Ok(output)) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let last = stderr.lines().last().unwrap_or_default().trim().to_string();
            (None, Some(format!("exited with {}: {last}", output.status)))
        }
    };

    tracing::debug!(tool = name, %location, ?version, ?error, "Probed tool");

    ToolStatus {
        name: name.to_string(),
        location,
        version,
        error,
    }
}
