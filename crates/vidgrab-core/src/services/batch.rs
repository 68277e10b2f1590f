//! Sequential batch downloads.
//!
//! Each URL runs through [`run_download`] with the same options. A failed
//! URL is recorded and the batch moves on; cancellation stops the batch and
//! leaves the remaining items pending.

use std::sync::Mutex;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use super::download::run_download;
use crate::errors::DownloadError;
use crate::events::DownloadEvent;
use crate::ports::{DownloadEventEmitter, MediaDownloader};
use crate::request::DownloadRequest;

/// Status of one batch item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchItemStatus {
    Pending,
    Downloading,
    Complete,
    Error,
}

/// One URL in a batch.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BatchItem {
    pub url: String,
    pub status: BatchItemStatus,
    /// Last overall percent reported for this item.
    pub progress: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchItem {
    fn pending(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: BatchItemStatus::Pending,
            progress: 0.0,
            filename: None,
            download_url: None,
            error: None,
        }
    }
}

/// Outcome of a batch run.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub items: Vec<BatchItem>,
}

impl BatchSummary {
    /// Number of items that produced a file.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.items
            .iter()
            .filter(|i| i.status == BatchItemStatus::Complete)
            .count()
    }

    /// Number of items that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.items
            .iter()
            .filter(|i| i.status == BatchItemStatus::Error)
            .count()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.items.len()
    }

    /// Human-readable summary line.
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "Batch complete! {}/{} succeeded.",
            self.succeeded(),
            self.total()
        )
    }
}

/// Hooks called around each batch item.
pub trait BatchObserver: Send + Sync {
    /// Called before item `index` (0-based) of `total` starts.
    fn item_started(&self, _index: usize, _total: usize, _url: &str) {}

    /// Called after item `index` finished, successfully or not.
    fn item_finished(&self, _index: usize, _item: &BatchItem) {}
}

/// Observer that ignores all hooks.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl BatchObserver for NoopObserver {}

/// Forwards events and remembers the item's latest percent.
struct ItemProgress<'a> {
    inner: &'a dyn DownloadEventEmitter,
    percent: Mutex<f64>,
}

impl<'a> ItemProgress<'a> {
    fn new(inner: &'a dyn DownloadEventEmitter) -> Self {
        Self {
            inner,
            percent: Mutex::new(0.0),
        }
    }

    fn percent(&self) -> f64 {
        self.percent.lock().map_or(0.0, |p| *p)
    }
}

impl DownloadEventEmitter for ItemProgress<'_> {
    fn emit(&self, event: DownloadEvent) {
        let reached = match &event {
            DownloadEvent::Progress { percent, .. } => Some(*percent),
            DownloadEvent::Complete { .. } => Some(100.0),
            _ => None,
        };
        if let (Some(reached), Ok(mut percent)) = (reached, self.percent.lock()) {
            *percent = reached;
        }
        self.inner.emit(event);
    }
}

/// Run `urls` one after another using the options of `template`.
pub async fn run_batch(
    downloader: &dyn MediaDownloader,
    template: &DownloadRequest,
    urls: &[String],
    emitter: &dyn DownloadEventEmitter,
    observer: &dyn BatchObserver,
    cancel: CancellationToken,
) -> BatchSummary {
    let mut summary = BatchSummary {
        items: urls.iter().map(BatchItem::pending).collect(),
    };
    let total = summary.total();

    for index in 0..total {
        if cancel.is_cancelled() {
            tracing::info!(target: "vidgrab.batch", remaining = total - index, "Batch cancelled");
            break;
        }

        let url = summary.items[index].url.clone();
        summary.items[index].status = BatchItemStatus::Downloading;
        observer.item_started(index, total, &url);

        let request = match template.for_url(&url).validate() {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(target: "vidgrab.batch", %url, error = %e, "Skipping invalid URL");
                let item = &mut summary.items[index];
                item.status = BatchItemStatus::Error;
                item.error = Some(e.to_string());
                observer.item_finished(index, item);
                continue;
            }
        };

        let tracker = ItemProgress::new(emitter);
        let outcome = run_download(downloader, &request, &tracker, cancel.child_token()).await;

        let item = &mut summary.items[index];
        item.progress = tracker.percent();
        match outcome {
            Ok(done) => {
                item.status = BatchItemStatus::Complete;
                item.filename = Some(done.filename);
                item.download_url = Some(done.public_url);
            }
            Err(DownloadError::Cancelled) => {
                item.status = BatchItemStatus::Pending;
                break;
            }
            Err(e) => {
                item.status = BatchItemStatus::Error;
                item.error = Some(e.to_string());
            }
        }
        observer.item_finished(index, &summary.items[index]);
    }

    tracing::info!(
        target: "vidgrab.batch",
        succeeded = summary.succeeded(),
        failed = summary.failed(),
        total,
        "Batch finished"
    );
    summary
}

/// Split a block of text into URLs: one per line, blanks and `#` comments dropped.
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}
