//! Single download orchestration.

use tokio_util::sync::CancellationToken;

use crate::errors::DownloadError;
use crate::events::{DownloadEvent, ProgressStage};
use crate::ports::{CompletedDownload, DownloadEventEmitter, MediaDownloader};
use crate::request::DownloadRequest;

/// Run one download and emit the full event sequence.
///
/// Emits `Starting` first. On success emits `Complete` progress followed by
/// the `complete` event; on failure emits one `error` event. Cancellation
/// emits nothing further since nobody is listening.
pub async fn run_download(
    downloader: &dyn MediaDownloader,
    request: &DownloadRequest,
    emitter: &dyn DownloadEventEmitter,
    cancel: CancellationToken,
) -> Result<CompletedDownload, DownloadError> {
    emitter.emit(DownloadEvent::progress(
        ProgressStage::Starting,
        0.0,
        "Initializing download...",
    ));

    let result = downloader.download(request, emitter, cancel).await;

    match &result {
        Ok(done) => {
            tracing::info!(
                target: "vidgrab.download",
                url = %request.url,
                filename = %done.filename,
                "Download complete"
            );
            emitter.emit(DownloadEvent::progress(
                ProgressStage::Complete,
                100.0,
                "Download complete!",
            ));
            emitter.emit(DownloadEvent::complete(&done.filename, &done.public_url));
        }
        Err(DownloadError::Cancelled) => {
            tracing::info!(target: "vidgrab.download", url = %request.url, "Download cancelled");
        }
        Err(e) => {
            tracing::warn!(
                target: "vidgrab.download",
                url = %request.url,
                error = %e,
                "Download failed"
            );
            emitter.emit(DownloadEvent::error(e.user_message()));
        }
    }

    result
}
