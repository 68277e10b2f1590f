//! Web server command handler.

use std::path::{Path, PathBuf};

use anyhow::Result;
use vidgrab_axum::{CorsConfig, ServerConfig, start_server};

use crate::bootstrap::CliContext;
use crate::commands::WebOptions;

/// Front-end build locations tried when `--static-dir` is not given.
const STATIC_DIR_CANDIDATES: &[&str] = &["./web/dist", "./dist", "./out"];

/// Build the server configuration from CLI options.
pub fn server_config(ctx: &CliContext, options: &WebOptions) -> ServerConfig {
    let cors = if options.allow_origins.is_empty() {
        CorsConfig::AllowAll
    } else {
        CorsConfig::AllowOrigins(options.allow_origins.clone())
    };

    ServerConfig {
        host: options.host.clone(),
        port: options.port,
        downloads_dir: ctx.config.downloads_dir.clone(),
        static_dir: options.static_dir.clone().or_else(find_static_dir),
        cors,
        history_capacity: options.history,
        downloader: ctx.settings.clone(),
    }
}

fn find_static_dir() -> Option<PathBuf> {
    STATIC_DIR_CANDIDATES
        .iter()
        .map(Path::new)
        .find(|dir| dir.join("index.html").exists())
        .map(Path::to_path_buf)
}

/// Start the web server and block until ctrl-c.
pub async fn execute(ctx: &CliContext, options: &WebOptions) -> Result<()> {
    let config = server_config(ctx, options);

    println!();
    println!("  vidgrab web server starting...");
    println!();
    if let Some(dir) = &config.static_dir {
        println!("  UI:        {}", dir.display());
    }
    println!("  API:       http://localhost:{}/api/download-stream", config.port);
    println!("  Downloads: {}", config.downloads_dir.display());
    println!("  Tool:      {}", config.downloader.launcher.describe());
    println!();
    println!("  Press Ctrl+C to stop");
    println!();

    start_server(config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::{CliConfig, bootstrap};
    use crate::parser::ToolArgs;

    fn ctx() -> CliContext {
        let args = ToolArgs {
            yt_dlp: Some(PathBuf::from("/opt/yt-dlp")),
            downloads_dir: Some(PathBuf::from("/tmp/vidgrab-out")),
            ..Default::default()
        };
        bootstrap(CliConfig::from_args(&args).unwrap())
    }

    #[test]
    fn allow_origins_restrict_cors() {
        let options = WebOptions {
            host: "127.0.0.1".to_string(),
            port: 8080,
            static_dir: Some(PathBuf::from("/srv/www")),
            allow_origins: vec!["http://localhost:5173".to_string()],
            history: 5,
        };
        let config = server_config(&ctx(), &options);

        assert!(matches!(config.cors, CorsConfig::AllowOrigins(_)));
        assert_eq!(config.static_dir, Some(PathBuf::from("/srv/www")));
        assert_eq!(config.history_capacity, 5);
        assert_eq!(config.downloads_dir, PathBuf::from("/tmp/vidgrab-out"));
    }
}
