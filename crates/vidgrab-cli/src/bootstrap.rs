//! CLI bootstrap - the composition root.
//!
//! Turns global flags into downloader settings and instantiates the yt-dlp
//! adapter. Handlers receive a [`CliContext`] and never build infrastructure
//! themselves.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use vidgrab_core::{MediaDownloader, default_downloads_dir};
use vidgrab_download::{DownloaderSettings, Launcher, YtDlpDownloader, discover_launcher};

use crate::parser::ToolArgs;

/// Resolved configuration for one CLI invocation.
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub downloads_dir: PathBuf,
    pub launcher: Launcher,
    pub ffmpeg: Option<PathBuf>,
}

impl CliConfig {
    /// Resolve flags (already merged with env by clap) against defaults.
    ///
    /// Launcher precedence: `--yt-dlp`, then `--python`, then discovery on
    /// `PATH`.
    pub fn from_args(args: &ToolArgs) -> Result<Self> {
        let downloads_dir = match &args.downloads_dir {
            Some(dir) => dir.clone(),
            None => default_downloads_dir()?,
        };

        let launcher = if let Some(path) = &args.yt_dlp {
            Launcher::Binary { path: path.clone() }
        } else if let Some(python) = &args.python {
            Launcher::PythonModule {
                python: python.clone(),
            }
        } else {
            discover_launcher().unwrap_or_default()
        };

        Ok(Self {
            downloads_dir,
            launcher,
            ffmpeg: args.ffmpeg.clone(),
        })
    }

    /// Downloader settings for this configuration.
    pub fn downloader_settings(&self) -> DownloaderSettings {
        DownloaderSettings::new(&self.downloads_dir)
            .with_launcher(self.launcher.clone())
            .with_ffmpeg_location(self.ffmpeg.clone())
    }
}

/// Services available to command handlers.
pub struct CliContext {
    pub config: CliConfig,
    pub settings: DownloaderSettings,
    pub downloader: Arc<dyn MediaDownloader>,
}

/// Build the CLI context.
pub fn bootstrap(config: CliConfig) -> CliContext {
    let settings = config.downloader_settings();

    tracing::debug!(
        target: "vidgrab.paths",
        downloads_dir = %config.downloads_dir.display(),
        launcher = %settings.launcher.describe(),
        "CLI bootstrap resolved paths"
    );

    let downloader: Arc<dyn MediaDownloader> = Arc::new(YtDlpDownloader::new(settings.clone()));
    CliContext {
        config,
        settings,
        downloader,
    }
}
