//! HTTP request handlers.

pub mod download_stream;
pub mod history;
