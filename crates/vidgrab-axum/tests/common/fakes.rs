//! Scripted `MediaDownloader` implementations.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use vidgrab_core::{
    CompletedDownload, DownloadError, DownloadEvent, DownloadEventEmitter, DownloadRequest,
    MediaDownloader, ProgressStage,
};

/// Emits one progress event, writes a file and succeeds.
pub struct SucceedingDownloader {
    pub downloads_dir: PathBuf,
}

#[async_trait]
impl MediaDownloader for SucceedingDownloader {
    async fn download(
        &self,
        request: &DownloadRequest,
        emitter: &dyn DownloadEventEmitter,
        _cancel: CancellationToken,
    ) -> Result<CompletedDownload, DownloadError> {
        emitter.emit(DownloadEvent::progress(
            ProgressStage::Downloading,
            35.0,
            "50.0% of 1.00MiB at 1.00MiB/s",
        ));

        let filename = format!(
            "{}{}.{}",
            request.custom_filename.as_deref().unwrap_or("clip"),
            request.quality.suffix(),
            request.container.extension()
        );
        let path = self.downloads_dir.join(&filename);
        tokio::fs::write(&path, b"media").await?;
        Ok(CompletedDownload::new(filename, path))
    }
}

/// Always fails as if yt-dlp exited non-zero.
pub struct FailingDownloader;

#[async_trait]
impl MediaDownloader for FailingDownloader {
    async fn download(
        &self,
        _request: &DownloadRequest,
        _emitter: &dyn DownloadEventEmitter,
        _cancel: CancellationToken,
    ) -> Result<CompletedDownload, DownloadError> {
        Err(DownloadError::Failed {
            code: Some(1),
            detail: "ERROR: Unsupported URL".to_string(),
        })
    }
}

/// Waits for cancellation and signals when it arrives.
#[derive(Default)]
pub struct HangingDownloader {
    pub cancelled: Arc<Notify>,
}

#[async_trait]
impl MediaDownloader for HangingDownloader {
    async fn download(
        &self,
        _request: &DownloadRequest,
        _emitter: &dyn DownloadEventEmitter,
        cancel: CancellationToken,
    ) -> Result<CompletedDownload, DownloadError> {
        cancel.cancelled().await;
        self.cancelled.notify_one();
        Err(DownloadError::Cancelled)
    }
}
