//! Port definitions for the download pipeline.
//!
//! `MediaDownloader` is implemented by the yt-dlp adapter; test code plugs in
//! scripted fakes. `DownloadEventEmitter` is implemented by every transport
//! that relays events (SSE channel, terminal progress, no-op).

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::errors::DownloadError;
use crate::events::DownloadEvent;
use crate::request::DownloadRequest;

/// Public URL prefix under which the downloads directory is served.
pub const DOWNLOADS_URL_PREFIX: &str = "/downloads";

/// Trait for emitting download events.
///
/// Implementations must not block: emission happens from the loop that
/// drains the child process' output.
pub trait DownloadEventEmitter: Send + Sync {
    /// Emit a download event.
    fn emit(&self, event: DownloadEvent);
}

/// A no-op event emitter for tests and contexts without a listener.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEmitter;

impl NoopEmitter {
    /// Create a new no-op emitter.
    pub const fn new() -> Self {
        Self
    }
}

impl DownloadEventEmitter for NoopEmitter {
    fn emit(&self, _event: DownloadEvent) {}
}

/// Emitter backed by an unbounded channel.
///
/// Send errors are ignored: a closed receiver means the client went away and
/// cancellation is handled separately.
#[derive(Debug, Clone)]
pub struct ChannelEmitter {
    sender: mpsc::UnboundedSender<DownloadEvent>,
}

impl ChannelEmitter {
    /// Create an emitter and the receiver that drains it.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<DownloadEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl DownloadEventEmitter for ChannelEmitter {
    fn emit(&self, event: DownloadEvent) {
        let _ = self.sender.send(event);
    }
}

/// Result of a successful download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletedDownload {
    /// File name inside the downloads directory.
    pub filename: String,
    /// Absolute path of the output file.
    pub path: PathBuf,
    /// Public path the file is served under.
    pub public_url: String,
}

impl CompletedDownload {
    /// Build a completed download, deriving the public URL from the file name.
    pub fn new(filename: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let filename = filename.into();
        let public_url = public_url_for(&filename);
        Self {
            filename,
            path: path.into(),
            public_url,
        }
    }
}

/// Public URL of a file in the downloads directory.
#[must_use]
pub fn public_url_for(filename: &str) -> String {
    format!("{DOWNLOADS_URL_PREFIX}/{}", urlencoding::encode(filename))
}

/// Port for running one download to completion.
///
/// Implementations emit intermediate `progress` and `warning` events only;
/// the `Starting`/`Complete`/`error` bookends are emitted by
/// [`crate::services::run_download`].
#[async_trait]
pub trait MediaDownloader: Send + Sync {
    /// Download `request` (already validated), honouring `cancel`.
    async fn download(
        &self,
        request: &DownloadRequest,
        emitter: &dyn DownloadEventEmitter,
        cancel: CancellationToken,
    ) -> Result<CompletedDownload, DownloadError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_emitter_accepts_events() {
        NoopEmitter::new().emit(DownloadEvent::warning("ignored"));
    }

    #[tokio::test]
    async fn channel_emitter_forwards_events() {
        let (emitter, mut rx) = ChannelEmitter::channel();
        emitter.emit(DownloadEvent::error("x"));
        assert_eq!(rx.recv().await, Some(DownloadEvent::error("x")));
    }

    #[test]
    fn channel_emitter_ignores_closed_receiver() {
        let (emitter, rx) = ChannelEmitter::channel();
        drop(rx);
        emitter.emit(DownloadEvent::warning("nobody listening"));
    }

    #[test]
    fn public_url_is_percent_encoded() {
        let done = CompletedDownload::new("My Clip_best.mp4", "/tmp/My Clip_best.mp4");
        assert_eq!(done.public_url, "/downloads/My%20Clip_best.mp4");
    }
}
