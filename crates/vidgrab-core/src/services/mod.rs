//! Transport-agnostic download services.
//!
//! Both the HTTP adapter and the CLI drive downloads through these functions
//! so the event sequence a client sees is identical everywhere.

mod batch;
mod download;

pub use batch::{
    BatchItem, BatchItemStatus, BatchObserver, BatchSummary, NoopObserver, parse_url_list,
    run_batch,
};
pub use download::run_download;
