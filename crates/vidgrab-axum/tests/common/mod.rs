//! Shared fixtures for router tests.

pub mod fakes;

use std::path::Path;
use std::sync::Arc;

use vidgrab_axum::{AxumContext, CorsConfig, create_router};
use vidgrab_core::MediaDownloader;

/// Router over a fake downloader writing into `downloads_dir`.
pub fn test_router(downloader: Arc<dyn MediaDownloader>, downloads_dir: &Path) -> axum::Router {
    let ctx = AxumContext::new(downloader, downloads_dir, 10);
    create_router(ctx, &CorsConfig::AllowAll)
}

/// `data:` payloads of an SSE body, parsed as JSON.
pub fn sse_payloads(body: &str) -> Vec<serde_json::Value> {
    body.lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|data| serde_json::from_str(data.trim()).expect("SSE data is JSON"))
        .collect()
}
