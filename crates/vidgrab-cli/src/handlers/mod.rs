//! Command handlers.
//!
//! Each handler receives the [`crate::CliContext`] and its parsed options.

pub mod batch;
pub mod check_deps;
pub mod get;
pub mod paths;
pub mod web;

use tokio_util::sync::CancellationToken;

/// Token cancelled on the first ctrl-c.
pub(crate) fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nInterrupted, stopping download...");
            trigger.cancel();
        }
    });
    token
}
