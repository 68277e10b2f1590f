//! Server-sent event stream for a single download.
//!
//! Each `DownloadEvent` becomes one `data: <json>` frame. The stream owns a
//! cancellation drop guard, so dropping the response (client disconnect)
//! cancels the download it belongs to.

use std::convert::Infallible;
use std::time::Duration;

use axum::http::header::{CACHE_CONTROL, HeaderName};
use axum::response::IntoResponse;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::stream::Stream;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_util::sync::DropGuard;
use vidgrab_core::DownloadEvent;

/// Proxies (nginx) buffer responses unless told otherwise.
const X_ACCEL_BUFFERING: HeaderName = HeaderName::from_static("x-accel-buffering");

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// Turn a receiver of download events into SSE frames.
pub fn event_frames(
    events: UnboundedReceiver<DownloadEvent>,
    guard: DropGuard,
) -> impl Stream<Item = Result<Event, Infallible>> + Send + 'static {
    UnboundedReceiverStream::new(events).filter_map(move |event| {
        // Held for the lifetime of the stream
        let _guard = &guard;
        match serde_json::to_string(&event) {
            Ok(json) => Some(Ok(Event::default().data(json))),
            Err(e) => {
                tracing::warn!("Failed to serialize event: {}", e);
                None
            }
        }
    })
}

/// Full SSE response: frames, keep-alive and no-buffering headers.
pub fn event_stream(
    events: UnboundedReceiver<DownloadEvent>,
    guard: DropGuard,
) -> impl IntoResponse {
    let sse = Sse::new(event_frames(events, guard)).keep_alive(
        KeepAlive::new()
            .interval(KEEP_ALIVE_INTERVAL)
            .text("ping"),
    );

    ([(CACHE_CONTROL, "no-cache"), (X_ACCEL_BUFFERING, "no")], sse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_util::sync::CancellationToken;
    use vidgrab_core::ChannelEmitter;
    use vidgrab_core::DownloadEventEmitter;

    #[tokio::test]
    async fn frames_follow_events_and_end_with_channel() {
        let (emitter, rx) = ChannelEmitter::channel();
        let token = CancellationToken::new();
        let frames = event_frames(rx, token.clone().drop_guard());

        emitter.emit(DownloadEvent::warning("one"));
        emitter.emit(DownloadEvent::error("two"));
        drop(emitter);

        let collected: Vec<_> = frames.collect().await;
        assert_eq!(collected.len(), 2);
    }

    #[tokio::test]
    async fn dropping_stream_cancels_token() {
        let (_emitter, rx) = ChannelEmitter::channel();
        let token = CancellationToken::new();
        let frames = event_frames(rx, token.clone().drop_guard());

        assert!(!token.is_cancelled());
        drop(frames);
        assert!(token.is_cancelled());
    }
}
