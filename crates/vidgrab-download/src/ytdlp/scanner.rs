//! yt-dlp output scanning.
//!
//! yt-dlp has no machine-readable progress protocol that survives merging and
//! post-processing, so stdout is matched line by line against the handful of
//! shapes it is known to print.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use vidgrab_core::{DownloadEvent, ProgressStage};

/// `[download]  45.2% of ~ 100.00MiB at 5.00MiB/s ETA 00:12`
static DOWNLOAD_PROGRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[download\]\s+([\d.]+)%\s+of\s+~?\s*([\d.]+\w+)\s+at\s+([\d.]+\w+/s)")
        .expect("download progress pattern is valid")
});

/// Share of the bar reserved for the transfer; merge/encode fill the rest.
const DOWNLOAD_SHARE: f64 = 0.7;
const DOWNLOAD_CAP: f64 = 70.0;
const MERGING_PERCENT: f64 = 75.0;
const ENCODING_PERCENT: f64 = 85.0;

const MERGING_MARKERS: &[&str] = &["[Merger]", "[ffmpeg]", "Merging"];
const ENCODING_MARKERS: &[&str] = &["Encoding", "libx264", "Converting"];
const MEDIA_EXTENSIONS: &[&str] = &[".mp4", ".mp3", ".mkv", ".webm"];

/// Stateful scanner for one download.
#[derive(Debug, Default)]
pub struct OutputScanner {
    downloads_dir: Option<PathBuf>,
    output_path: Option<String>,
}

impl OutputScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also accept path lines under `dir` even if they contain `[` or `%`.
    #[must_use]
    pub fn with_downloads_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.downloads_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Map one stdout line to zero or more events.
    pub fn scan_stdout(&mut self, line: &str) -> Vec<DownloadEvent> {
        let line = line.trim();
        if line.is_empty() {
            return Vec::new();
        }

        let mut events = Vec::new();

        if let Some(caps) = DOWNLOAD_PROGRESS.captures(line) {
            let raw = caps[1].parse::<f64>().unwrap_or(0.0);
            let percent = (raw * DOWNLOAD_SHARE).min(DOWNLOAD_CAP);
            events.push(DownloadEvent::progress(
                ProgressStage::Downloading,
                percent,
                format!("{raw:.1}% of {} at {}", &caps[2], &caps[3]),
            ));
        }

        if MERGING_MARKERS.iter().any(|m| line.contains(m)) {
            events.push(DownloadEvent::progress(
                ProgressStage::Merging,
                MERGING_PERCENT,
                "Merging video and audio...",
            ));
        }

        if ENCODING_MARKERS.iter().any(|m| line.contains(m)) {
            events.push(DownloadEvent::progress(
                ProgressStage::Encoding,
                ENCODING_PERCENT,
                "Re-encoding for compatibility...",
            ));
        }

        if self.is_output_path(line) {
            self.output_path = Some(line.to_string());
        }

        events
    }

    /// Map one stderr line to a warning, if it is one.
    pub fn scan_stderr(&self, line: &str) -> Option<DownloadEvent> {
        let line = line.trim();
        line.contains("WARNING")
            .then(|| DownloadEvent::warning(line))
    }

    /// Last output path seen on stdout.
    pub fn output_path(&self) -> Option<&str> {
        self.output_path.as_deref()
    }

    fn is_output_path(&self, line: &str) -> bool {
        if !MEDIA_EXTENSIONS.iter().any(|ext| line.contains(ext)) {
            return false;
        }
        if self
            .downloads_dir
            .as_ref()
            .is_some_and(|dir| Path::new(line).starts_with(dir))
        {
            return true;
        }
        !line.contains('[') && !line.contains('%')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(scanner: &mut OutputScanner, line: &str) -> DownloadEvent {
        let mut events = scanner.scan_stdout(line);
        assert_eq!(events.len(), 1, "expected one event for {line:?}: {events:?}");
        events.remove(0)
    }

    #[test]
    fn download_progress_is_scaled() {
        let mut scanner = OutputScanner::new();
        let event = single(
            &mut scanner,
            "[download]  45.2% of 100.00MiB at 5.00MiB/s ETA 00:12",
        );

        let DownloadEvent::Progress {
            stage,
            percent,
            message,
        } = event
        else {
            panic!("expected progress");
        };
        assert_eq!(stage, ProgressStage::Downloading);
        assert!((percent - 31.64).abs() < 1e-9);
        assert_eq!(message, "45.2% of 100.00MiB at 5.00MiB/s");
    }

    #[test]
    fn download_progress_caps_at_seventy() {
        let mut scanner = OutputScanner::new();
        let event = single(&mut scanner, "[download] 100.0% of 3.20MiB at 9.10MiB/s");
        assert!(matches!(event, DownloadEvent::Progress { percent, .. } if (percent - 70.0).abs() < f64::EPSILON));
    }

    #[test]
    fn estimated_size_is_accepted() {
        let mut scanner = OutputScanner::new();
        let event = single(&mut scanner, "[download]  10.0% of ~ 50.00MiB at 1.00MiB/s");
        assert!(matches!(event, DownloadEvent::Progress { ref message, .. } if message == "10.0% of 50.00MiB at 1.00MiB/s"));
    }

    #[test]
    fn merge_and_encode_markers() {
        let mut scanner = OutputScanner::new();

        let merge = single(&mut scanner, "[Merger] Merging formats into \"x.mp4\"");
        assert_eq!(merge.stage(), Some(ProgressStage::Merging));

        let encode = single(&mut scanner, "[VideoConvertor] Converting video");
        assert_eq!(encode.stage(), Some(ProgressStage::Encoding));
    }

    #[test]
    fn unrelated_lines_yield_nothing() {
        let mut scanner = OutputScanner::new();
        assert!(scanner.scan_stdout("").is_empty());
        assert!(scanner.scan_stdout("[youtube] abc: Downloading webpage").is_empty());
        assert!(scanner.scan_stdout("[download] Destination: x.f137.mp4").is_empty());
        assert!(scanner.output_path().is_none());
    }

    #[test]
    fn bare_path_becomes_output() {
        let mut scanner = OutputScanner::new();
        assert!(scanner.scan_stdout("/srv/downloads/first_best.webm").is_empty());
        assert!(scanner.scan_stdout("/srv/downloads/clip_best.mp4").is_empty());
        assert_eq!(scanner.output_path(), Some("/srv/downloads/clip_best.mp4"));
    }

    #[test]
    fn bracketed_path_under_downloads_dir() {
        let mut scanner = OutputScanner::new().with_downloads_dir("/srv/downloads");
        scanner.scan_stdout("/srv/downloads/Live_[2024]_720p.mp4");
        assert_eq!(scanner.output_path(), Some("/srv/downloads/Live_[2024]_720p.mp4"));
    }

    #[test]
    fn stderr_warnings() {
        let scanner = OutputScanner::new();
        let warning = scanner.scan_stderr("  WARNING: falling back to generic extractor ");
        assert_eq!(
            warning,
            Some(DownloadEvent::warning("WARNING: falling back to generic extractor"))
        );
        assert!(scanner.scan_stderr("ERROR: Unsupported URL").is_none());
    }
}
