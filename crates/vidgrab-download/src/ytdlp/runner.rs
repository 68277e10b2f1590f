//! `MediaDownloader` backed by a yt-dlp child process.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;
use vidgrab_core::{
    CompletedDownload, Container, DownloadError, DownloadEventEmitter,
    DownloadRequest, MediaDownloader, ensure_directory,
};

use super::args::build_args;
use super::scanner::OutputScanner;
use crate::process::{OutputLine, StreamKind, shutdown_child, spawn_line_reader};
use crate::settings::DownloaderSettings;
use crate::throttle::ProgressThrottle;

const LINE_BUFFER: usize = 256;

/// Runs yt-dlp once per request.
#[derive(Clone, Debug)]
pub struct YtDlpDownloader {
    settings: DownloaderSettings,
}

impl YtDlpDownloader {
    pub const fn new(settings: DownloaderSettings) -> Self {
        Self { settings }
    }

    pub const fn settings(&self) -> &DownloaderSettings {
        &self.settings
    }
}

#[async_trait]
impl MediaDownloader for YtDlpDownloader {
    async fn download(
        &self,
        request: &DownloadRequest,
        emitter: &dyn DownloadEventEmitter,
        cancel: CancellationToken,
    ) -> Result<CompletedDownload, DownloadError> {
        let download_id = Uuid::new_v4();
        let settings = &self.settings;

        ensure_directory(&settings.downloads_dir)
            .map_err(|e| DownloadError::Io(e.to_string()))?;

        let program = settings.launcher.program();
        let args = build_args(settings, request);
        debug!(
            target: "vidgrab.download",
            %download_id,
            program = %program.display(),
            ?args,
            "Spawning downloader"
        );

        let mut child = tokio::process::Command::new(program)
            .args(&args)
            .env("PYTHONUNBUFFERED", "1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    DownloadError::ToolNotFound(program.display().to_string())
                } else {
                    DownloadError::Spawn(e.to_string())
                }
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DownloadError::Spawn("stdout was not captured".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| DownloadError::Spawn("stderr was not captured".to_string()))?;

        let (tx, mut rx) = mpsc::channel::<OutputLine>(LINE_BUFFER);
        spawn_line_reader(stdout, StreamKind::Stdout, tx.clone());
        spawn_line_reader(stderr, StreamKind::Stderr, tx);

        let mut scanner = OutputScanner::new().with_downloads_dir(&settings.downloads_dir);
        let mut throttle = ProgressThrottle::new(settings.progress_interval);
        let mut last_stderr: Option<String> = None;

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    info!(target: "vidgrab.download", %download_id, "Download cancelled, stopping downloader");
                    if let Err(e) = shutdown_child(child).await {
                        warn!(target: "vidgrab.download", %download_id, error = %e, "Failed to stop downloader");
                    }
                    return Err(DownloadError::Cancelled);
                }
                line = rx.recv() => {
                    // Both pipes closed
                    let Some(line) = line else { break };
                    match line.kind {
                        StreamKind::Stdout => {
                            for event in scanner.scan_stdout(&line.text) {
                                if throttle.admit(&event) {
                                    emitter.emit(event);
                                }
                            }
                        }
                        StreamKind::Stderr => {
                            debug!(target: "vidgrab.download", %download_id, "stderr: {}", line.text);
                            if let Some(event) = scanner.scan_stderr(&line.text) {
                                emitter.emit(event);
                            }
                            last_stderr = Some(line.text.trim().to_string());
                        }
                    }
                }
            }
        }

        let status = child.wait().await?;
        if !status.success() {
            let detail = last_stderr.unwrap_or_else(|| "no error output".to_string());
            warn!(
                target: "vidgrab.download",
                %download_id,
                code = ?status.code(),
                %detail,
                "Downloader failed"
            );
            return Err(DownloadError::Failed {
                code: status.code(),
                detail,
            });
        }

        let printed = scanner.output_path().ok_or(DownloadError::NoOutputFile)?;
        let path = resolve_output_file(&settings.downloads_dir, printed, request.container);
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or(DownloadError::NoOutputFile)?
            .to_string();

        info!(target: "vidgrab.download", %download_id, %filename, "Downloader finished");
        Ok(CompletedDownload::new(filename, path))
    }
}

/// Locate the file yt-dlp actually left behind, as an absolute path.
///
/// yt-dlp prints paths the way the `-o` template spelled them, so a relative
/// downloads directory comes back already prefixed with it. Falls back to the
/// same stem with the requested container's extension when the printed path
/// is stale (e.g. renamed by a post-processor).
fn resolve_output_file(downloads_dir: &Path, printed: &str, container: Container) -> PathBuf {
    let printed = Path::new(printed);
    let path = if printed.is_absolute() || printed.starts_with(downloads_dir) {
        printed.to_path_buf()
    } else {
        downloads_dir.join(printed)
    };
    let path = std::path::absolute(&path).unwrap_or(path);

    if path.exists() {
        return path;
    }

    let candidate = path.with_extension(container.extension());
    if candidate.exists() {
        return candidate;
    }
    path
}
