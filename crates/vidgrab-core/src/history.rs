//! Bounded recency list of completed downloads.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ports::CompletedDownload;

/// Number of entries kept when no capacity is configured.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// A completed download as shown in the history list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// File name inside the downloads directory.
    pub filename: String,
    /// Public path of the file.
    pub url: String,
    /// URL the user submitted.
    pub original_url: String,
    /// When the download finished.
    pub completed_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Build an entry for a completed download, stamped now.
    pub fn from_completed(completed: &CompletedDownload, original_url: impl Into<String>) -> Self {
        Self {
            filename: completed.filename.clone(),
            url: completed.public_url.clone(),
            original_url: original_url.into(),
            completed_at: Utc::now(),
        }
    }
}

/// Most-recent-first list with a fixed capacity.
#[derive(Clone, Debug)]
pub struct DownloadHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl DownloadHistory {
    /// Create an empty history. A capacity of 0 is raised to 1.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert at the front, evicting the oldest entry when full.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    /// Entries, newest first.
    #[must_use]
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for DownloadHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
