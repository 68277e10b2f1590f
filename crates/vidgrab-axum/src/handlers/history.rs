//! Download history handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use vidgrab_core::HistoryEntry;

use crate::state::AppState;

/// Completed downloads, newest first.
pub async fn list(State(state): State<AppState>) -> Json<Vec<HistoryEntry>> {
    Json(state.history.read().await.entries())
}

/// Forget all completed downloads. Files on disk are kept.
pub async fn clear(State(state): State<AppState>) -> StatusCode {
    let mut history = state.history.write().await;
    let removed = history.len();
    history.clear();
    tracing::info!(target: "vidgrab.history", removed, "History cleared");
    StatusCode::NO_CONTENT
}
