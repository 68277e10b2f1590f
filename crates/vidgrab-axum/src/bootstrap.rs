//! Axum server bootstrap - the composition root.
//!
//! This module is the only place where the downloader, history and paths are
//! wired together for the web adapter.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::RwLock;
use vidgrab_core::{
    DEFAULT_HISTORY_CAPACITY, DownloadHistory, MediaDownloader, default_downloads_dir,
    ensure_directory,
};
use vidgrab_download::{DownloaderSettings, YtDlpDownloader, discover_launcher};

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins (development mode).
    #[default]
    AllowAll,
    /// Allow specific origins (production mode).
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port for the HTTP server.
    pub port: u16,
    /// Directory downloads are written to and served from.
    pub downloads_dir: PathBuf,
    /// Optional path to static assets for SPA serving.
    pub static_dir: Option<PathBuf>,
    /// CORS configuration.
    pub cors: CorsConfig,
    /// Number of completed downloads kept in memory.
    pub history_capacity: usize,
    /// yt-dlp adapter settings. `downloads_dir` is overridden by the field above.
    pub downloader: DownloaderSettings,
}

impl ServerConfig {
    /// Create config with default paths and the first yt-dlp launcher found.
    pub fn with_defaults() -> Result<Self> {
        let downloads_dir = default_downloads_dir()?;
        let launcher = discover_launcher().unwrap_or_default();

        Ok(Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            downloader: DownloaderSettings::new(&downloads_dir).with_launcher(launcher),
            downloads_dir,
            static_dir: None,
            cors: CorsConfig::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        })
    }

    /// Set the static directory for SPA serving.
    #[must_use]
    pub fn with_static_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(path.into());
        self
    }

    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }

    /// Set the downloads directory.
    #[must_use]
    pub fn with_downloads_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.downloads_dir = path.into();
        self
    }
}

/// Application context for the Axum adapter.
pub struct AxumContext {
    /// Downloader as trait object.
    pub downloader: Arc<dyn MediaDownloader>,
    /// Completed downloads, newest first.
    pub history: RwLock<DownloadHistory>,
    /// Directory served under `/downloads`.
    pub downloads_dir: PathBuf,
}

impl AxumContext {
    /// Assemble a context from parts (tests plug in fake downloaders here).
    pub fn new(
        downloader: Arc<dyn MediaDownloader>,
        downloads_dir: impl Into<PathBuf>,
        history_capacity: usize,
    ) -> Self {
        Self {
            downloader,
            history: RwLock::new(DownloadHistory::new(history_capacity)),
            downloads_dir: downloads_dir.into(),
        }
    }
}

/// Build the context: create the downloads directory and the yt-dlp adapter.
pub fn bootstrap(config: &ServerConfig) -> Result<AxumContext> {
    ensure_directory(&config.downloads_dir)
        .with_context(|| {
            format!(
                "Cannot use downloads directory {}",
                config.downloads_dir.display()
            )
        })?;

    let mut settings = config.downloader.clone();
    settings.downloads_dir.clone_from(&config.downloads_dir);

    tracing::info!(
        target: "vidgrab.paths",
        downloads_dir = %config.downloads_dir.display(),
        launcher = %settings.launcher.describe(),
        ffmpeg = ?settings.ffmpeg_location,
        "Axum bootstrap resolved paths"
    );

    let downloader: Arc<dyn MediaDownloader> = Arc::new(YtDlpDownloader::new(settings));
    Ok(AxumContext::new(
        downloader,
        config.downloads_dir.clone(),
        config.history_capacity,
    ))
}

/// Start the web server and run until ctrl-c.
///
/// If `config.static_dir` is set, serves static assets with SPA fallback.
/// Otherwise, serves only the API endpoints and downloads.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    use tokio::net::TcpListener;
    use tracing::info;

    let ctx = bootstrap(&config)?;

    let app = if let Some(ref static_dir) = config.static_dir {
        info!("Serving static assets from: {}", static_dir.display());
        crate::routes::create_spa_router(ctx, static_dir, &config.cors)
    } else {
        crate::routes::create_router(ctx, &config.cors)
    };

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    if config.static_dir.is_some() {
        info!("vidgrab web server (with UI) listening on http://{}", addr);
    } else {
        info!("vidgrab web server (API only) listening on http://{}", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("vidgrab web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_config(downloads_dir: PathBuf) -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            downloader: DownloaderSettings::new("/ignored"),
            downloads_dir,
            static_dir: None,
            cors: CorsConfig::AllowAll,
            history_capacity: 3,
        }
    }

    #[tokio::test]
    async fn bootstrap_creates_downloads_dir() {
        let temp = tempdir().unwrap();
        let downloads = temp.path().join("public").join("downloads");

        let ctx = bootstrap(&test_config(downloads.clone())).unwrap();

        assert!(downloads.is_dir());
        assert_eq!(ctx.downloads_dir, downloads);
        assert_eq!(ctx.history.read().await.capacity(), 3);
    }

    #[test]
    fn bootstrap_rejects_file_as_downloads_dir() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("not-a-dir");
        std::fs::write(&file, b"x").unwrap();

        assert!(bootstrap(&test_config(file)).is_err());
    }

    #[test]
    fn builder_methods() {
        let config = test_config(PathBuf::from("/tmp/d"))
            .with_static_dir("/srv/www")
            .with_allowed_origins(vec!["http://localhost:5173".to_string()]);

        assert_eq!(config.static_dir, Some(PathBuf::from("/srv/www")));
        assert!(matches!(config.cors, CorsConfig::AllowOrigins(ref o) if o.len() == 1));
    }
}
