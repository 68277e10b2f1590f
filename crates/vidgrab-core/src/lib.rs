//! Core domain types, ports and services for vidgrab.
//!
//! This crate is transport-agnostic: it knows nothing about HTTP, terminals
//! or child processes. Adapters (`vidgrab-download`, `vidgrab-axum`,
//! `vidgrab-cli`) depend on it and plug into its ports.
//!
//! - `request` - validated download requests, quality and container choices
//! - `events` - the tagged progress/warning/complete/error events
//! - `errors` - request validation and download failure types
//! - `history` - bounded recency list of completed downloads
//! - `ports` - `MediaDownloader` and `DownloadEventEmitter` traits
//! - `services` - single download and sequential batch orchestration
//! - `paths` - data and downloads directory resolution

pub mod errors;
pub mod events;
pub mod history;
pub mod paths;
pub mod ports;
pub mod request;
pub mod services;

// Re-export commonly used types for convenience
pub use errors::{DownloadError, RequestError};
pub use events::{DownloadEvent, ProgressStage};
pub use history::{DEFAULT_HISTORY_CAPACITY, DownloadHistory, HistoryEntry};
pub use ports::{
    ChannelEmitter, CompletedDownload, DownloadEventEmitter, MediaDownloader, NoopEmitter,
};
pub use request::{Container, DownloadRequest, Quality, sanitize_filename};
pub use services::{
    BatchItem, BatchItemStatus, BatchObserver, BatchSummary, NoopObserver, parse_url_list,
    run_batch, run_download,
};

pub use paths::{PathError, data_root, default_downloads_dir, ensure_directory};
