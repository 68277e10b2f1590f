//! Subcommands and their shared option groups.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use vidgrab_core::{Container, DownloadRequest, Quality, RequestError};

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Web(WebOptions),

    /// Download a single URL
    Get {
        /// Page or media URL
        url: String,
        #[command(flatten)]
        options: DownloadOptions,
    },

    /// Download several URLs one after another
    Batch {
        /// File with one URL per line (`#` starts a comment)
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// URLs to download (appended after those from --file)
        urls: Vec<String>,
        #[command(flatten)]
        options: DownloadOptions,
    },

    /// Check that yt-dlp and ffmpeg can be run
    CheckDeps,

    /// Show resolved directories and tools
    Paths,
}

/// Options for `web`.
#[derive(Args, Clone, Debug)]
pub struct WebOptions {
    /// Interface to bind
    #[arg(long, default_value = "0.0.0.0", env = "VIDGRAB_HOST")]
    pub host: String,
    /// Port to listen on
    #[arg(short, long, default_value_t = 3000, env = "VIDGRAB_PORT")]
    pub port: u16,
    /// Front-end build to serve with SPA fallback
    #[arg(long)]
    pub static_dir: Option<PathBuf>,
    /// Allowed CORS origin (repeatable); all origins when omitted
    #[arg(long = "allow-origin")]
    pub allow_origins: Vec<String>,
    /// Completed downloads kept in the in-memory history
    #[arg(long, default_value_t = vidgrab_core::DEFAULT_HISTORY_CAPACITY)]
    pub history: usize,
}

/// Options shared by `get` and `batch`.
#[derive(Args, Clone, Debug, Default)]
pub struct DownloadOptions {
    /// best, 1080, 720, 480 or audio
    #[arg(short, long, default_value = "best")]
    pub quality: String,
    /// Output container: mp4, mkv, webm or mp3
    #[arg(short, long)]
    pub format: Option<String>,
    /// Custom file name (without extension)
    #[arg(short, long)]
    pub name: Option<String>,
    /// Download and embed English subtitles
    #[arg(long)]
    pub subtitles: bool,
}

impl DownloadOptions {
    /// Request for `url` with these options, not yet validated.
    pub fn to_request(&self, url: &str) -> Result<DownloadRequest, RequestError> {
        let mut request = DownloadRequest::new(url)
            .with_quality(Quality::parse(&self.quality))
            .with_custom_filename(self.name.clone())
            .with_subtitles(self.subtitles);

        if let Some(format) = &self.format {
            request = request.with_container(format.parse::<Container>()?);
        }
        Ok(request)
    }
}
