//! Download request types.
//!
//! A `DownloadRequest` is built from untrusted input (HTTP body, CLI flags)
//! and must go through [`DownloadRequest::validate`] before it reaches a
//! downloader. Validation normalizes the container for audio downloads and
//! sanitizes the custom filename.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::RequestError;

/// Characters that are unsafe in file names on at least one platform.
const UNSAFE_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Requested output quality.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Quality {
    /// Best available video and audio.
    #[default]
    Best,
    /// Video capped at 1080 lines.
    P1080,
    /// Video capped at 720 lines.
    P720,
    /// Video capped at 480 lines.
    P480,
    /// Audio only, extracted to mp3.
    Audio,
}

impl Quality {
    /// All qualities in menu order.
    pub const ALL: [Self; 5] = [Self::Best, Self::P1080, Self::P720, Self::P480, Self::Audio];

    /// Wire representation (`best`, `1080`, `720`, `480`, `audio`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Best => "best",
            Self::P1080 => "1080",
            Self::P720 => "720",
            Self::P480 => "480",
            Self::Audio => "audio",
        }
    }

    /// Parse from the wire representation.
    ///
    /// Unknown values fall back to `Best`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().trim_end_matches('p') {
            "1080" => Self::P1080,
            "720" => Self::P720,
            "480" => Self::P480,
            "audio" | "mp3" => Self::Audio,
            _ => Self::Best,
        }
    }

    /// Suffix appended to the output file stem.
    #[must_use]
    pub const fn suffix(&self) -> &'static str {
        match self {
            Self::Best => "_best",
            Self::P1080 => "_1080p",
            Self::P720 => "_720p",
            Self::P480 => "_480p",
            Self::Audio => "_audio",
        }
    }

    /// Maximum video height, if capped.
    #[must_use]
    pub const fn max_height(&self) -> Option<u32> {
        match self {
            Self::P1080 => Some(1080),
            Self::P720 => Some(720),
            Self::P480 => Some(480),
            Self::Best | Self::Audio => None,
        }
    }

    /// Whether this quality produces an audio-only file.
    #[must_use]
    pub const fn is_audio(&self) -> bool {
        matches!(self, Self::Audio)
    }
}

impl From<String> for Quality {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Quality> for String {
    fn from(value: Quality) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    #[default]
    Mp4,
    Mkv,
    Webm,
    Mp3,
}

impl Container {
    /// File extension / yt-dlp format name.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Mkv => "mkv",
            Self::Webm => "webm",
            Self::Mp3 => "mp3",
        }
    }

    /// Whether this container only carries audio.
    #[must_use]
    pub const fn is_audio_only(&self) -> bool {
        matches!(self, Self::Mp3)
    }
}

impl FromStr for Container {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "mp4" => Ok(Self::Mp4),
            "mkv" => Ok(Self::Mkv),
            "webm" => Ok(Self::Webm),
            "mp3" => Ok(Self::Mp3),
            _ => Err(RequestError::UnsupportedContainer(s.to_string())),
        }
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A request to download and transcode one URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequest {
    /// Source page or media URL.
    pub url: String,
    /// Requested quality.
    #[serde(default)]
    pub quality: Quality,
    /// Optional output file stem (sanitized on validation).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_filename: Option<String>,
    /// Download and embed English subtitles.
    #[serde(default)]
    pub subtitles: bool,
    /// Output container.
    #[serde(default, rename = "outputFormat")]
    pub container: Container,
}

impl DownloadRequest {
    /// Create a request for `url` with default options.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            quality: Quality::default(),
            custom_filename: None,
            subtitles: false,
            container: Container::default(),
        }
    }

    /// Set the quality.
    #[must_use]
    pub const fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    /// Set the output container.
    #[must_use]
    pub const fn with_container(mut self, container: Container) -> Self {
        self.container = container;
        self
    }

    /// Set a custom output file stem.
    #[must_use]
    pub fn with_custom_filename(mut self, name: Option<String>) -> Self {
        self.custom_filename = name;
        self
    }

    /// Enable or disable subtitle embedding.
    #[must_use]
    pub const fn with_subtitles(mut self, subtitles: bool) -> Self {
        self.subtitles = subtitles;
        self
    }

    /// Same options, different URL (used by batch mode).
    #[must_use]
    pub fn for_url(&self, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..self.clone()
        }
    }

    /// Validate and normalize the request.
    ///
    /// - the URL must be a non-empty http(s) URL
    /// - audio quality forces the mp3 container
    /// - mp3 with a video quality is rejected
    /// - the custom filename is sanitized and dropped if nothing is left
    pub fn validate(mut self) -> Result<Self, RequestError> {
        let trimmed = self.url.trim();
        if trimmed.is_empty() {
            return Err(RequestError::MissingUrl);
        }

        let parsed = url::Url::parse(trimmed).map_err(|e| RequestError::InvalidUrl {
            url: trimmed.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(RequestError::UnsupportedScheme(parsed.scheme().to_string()));
        }
        self.url = trimmed.to_string();

        if self.quality.is_audio() {
            self.container = Container::Mp3;
        } else if self.container.is_audio_only() {
            return Err(RequestError::IncompatibleContainer {
                quality: self.quality.to_string(),
                container: self.container.to_string(),
            });
        }

        self.custom_filename = self
            .custom_filename
            .as_deref()
            .map(sanitize_filename)
            .filter(|name| !name.is_empty());

        Ok(self)
    }
}

/// Replace path-unsafe characters with `_`.
///
/// Covers `< > : " / \ | ? *` and ASCII control characters, then trims
/// surrounding whitespace.
pub fn sanitize_filename(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            if UNSAFE_FILENAME_CHARS.contains(&c) || c.is_ascii_control() {
                '_'
            } else {
                c
            }
        })
        .collect()
}
