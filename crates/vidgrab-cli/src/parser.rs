//! Root CLI structure with global options.

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::commands::Commands;

/// Download videos and audio with yt-dlp and ffmpeg.
#[derive(Parser)]
#[command(name = "vidgrab")]
#[command(about = "Download and transcode videos with live progress")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub tools: ToolArgs,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Where the external tools and output live.
#[derive(Args, Clone, Debug, Default)]
pub struct ToolArgs {
    /// Python interpreter used as `python -m yt_dlp`
    #[arg(long, global = true, env = "VIDGRAB_PYTHON")]
    pub python: Option<PathBuf>,

    /// Standalone yt-dlp executable (takes precedence over --python)
    #[arg(long = "yt-dlp", global = true, env = "VIDGRAB_YTDLP")]
    pub yt_dlp: Option<PathBuf>,

    /// ffmpeg binary or the directory containing it
    #[arg(long, global = true, env = "VIDGRAB_FFMPEG")]
    pub ffmpeg: Option<PathBuf>,

    /// Directory downloads are written to
    #[arg(long = "downloads-dir", global = true, env = "VIDGRAB_DOWNLOADS_DIR")]
    pub downloads_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_tool_args() {
        let cli = Cli::parse_from([
            "vidgrab",
            "paths",
            "--yt-dlp",
            "/opt/yt-dlp",
            "--downloads-dir",
            "/tmp/out",
            "-v",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.tools.yt_dlp, Some(PathBuf::from("/opt/yt-dlp")));
        assert_eq!(cli.tools.downloads_dir, Some(PathBuf::from("/tmp/out")));
    }
}
