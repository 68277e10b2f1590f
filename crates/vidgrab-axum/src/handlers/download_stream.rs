//! Streaming download handler.
//!
//! `POST /api/download-stream` validates the body, starts the download in a
//! background task and answers with an SSE stream of its events. The stream
//! ends after the `complete` or `error` event.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;
use vidgrab_core::{
    ChannelEmitter, DownloadRequest, HistoryEntry, Quality, RequestError, run_download,
};

use crate::error::HttpError;
use crate::sse::event_stream;
use crate::state::AppState;

/// Request body as sent by the browser client.
///
/// Everything is optional at the serde level so a missing or `null` URL is
/// reported as "URL is required" rather than a deserialization error.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadStreamRequest {
    pub url: Option<String>,
    pub quality: Option<String>,
    pub custom_filename: Option<String>,
    pub subtitles: Option<bool>,
    pub output_format: Option<String>,
}

impl DownloadStreamRequest {
    /// Convert into a validated core request.
    pub fn into_request(self) -> Result<DownloadRequest, RequestError> {
        let quality = self
            .quality
            .as_deref()
            .map(Quality::parse)
            .unwrap_or_default();

        let mut request = DownloadRequest::new(self.url.unwrap_or_default())
            .with_quality(quality)
            .with_custom_filename(self.custom_filename)
            .with_subtitles(self.subtitles.unwrap_or(false));

        if let Some(format) = self.output_format.as_deref().filter(|f| !f.trim().is_empty()) {
            request = request.with_container(format.parse()?);
        }

        request.validate()
    }
}

/// Start a download and stream its progress.
pub async fn stream(
    State(state): State<AppState>,
    payload: Result<Json<DownloadStreamRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(body) = payload.map_err(|e| HttpError::BadRequest(e.body_text()))?;
    let request = body.into_request()?;

    let stream_id = Uuid::new_v4();
    tracing::info!(
        target: "vidgrab.http",
        %stream_id,
        url = %request.url,
        quality = %request.quality,
        container = %request.container,
        "Download stream opened"
    );

    let (emitter, events) = ChannelEmitter::channel();
    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();

    tokio::spawn(async move {
        let result = run_download(state.downloader.as_ref(), &request, &emitter, cancel).await;
        if let Ok(done) = result {
            state
                .history
                .write()
                .await
                .record(HistoryEntry::from_completed(&done, request.url.as_str()));
        }
        tracing::debug!(target: "vidgrab.http", %stream_id, "Download task finished");
    });

    Ok(event_stream(events, guard))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidgrab_core::Container;

    fn body(url: &str) -> DownloadStreamRequest {
        DownloadStreamRequest {
            url: Some(url.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_to_best_mp4() {
        let request = body("https://example.com/v").into_request().unwrap();
        assert_eq!(request.quality, Quality::Best);
        assert_eq!(request.container, Container::Mp4);
    }

    #[test]
    fn audio_forces_mp3() {
        let mut raw = body("https://example.com/v");
        raw.quality = Some("audio".to_string());
        raw.output_format = Some("mkv".to_string());

        let request = raw.into_request().unwrap();
        assert_eq!(request.container, Container::Mp3);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let mut raw = body("https://example.com/v");
        raw.output_format = Some("avi".to_string());

        assert!(matches!(
            raw.into_request(),
            Err(RequestError::UnsupportedContainer(_))
        ));
    }

    #[test]
    fn missing_url_is_rejected() {
        assert!(matches!(
            body("  ").into_request(),
            Err(RequestError::MissingUrl)
        ));
    }

    #[test]
    fn null_fields_deserialize_as_missing() {
        let raw: DownloadStreamRequest =
            serde_json::from_str(r#"{"url":null,"quality":"720","subtitles":null}"#).unwrap();
        assert!(matches!(raw.into_request(), Err(RequestError::MissingUrl)));

        let raw: DownloadStreamRequest =
            serde_json::from_str(r#"{"url":"https://example.com/v","subtitles":null}"#).unwrap();
        assert!(!raw.into_request().unwrap().subtitles);
    }

    #[test]
    fn camel_case_fields_deserialize() {
        let raw: DownloadStreamRequest = serde_json::from_str(
            r#"{"url":"https://example.com/v","customFilename":"clip","outputFormat":"webm","subtitles":true}"#,
        )
        .unwrap();

        let request = raw.into_request().unwrap();
        assert_eq!(request.custom_filename.as_deref(), Some("clip"));
        assert_eq!(request.container, Container::Webm);
        assert!(request.subtitles);
    }
}
