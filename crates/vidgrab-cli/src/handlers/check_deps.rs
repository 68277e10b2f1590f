//! Dependency check handler.

use anyhow::{Result, bail};
use vidgrab_download::{ToolStatus, probe_tools};

use crate::bootstrap::CliContext;

// ANSI color codes
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Run both tools with their version flags and print a status table.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    let report = probe_tools(&ctx.settings).await;

    println!("{BOLD}Dependencies:{RESET}");
    println!("{}", "-".repeat(60));
    print_tool(&report.downloader);
    print_tool(&report.ffmpeg);

    if !report.downloader.is_available() {
        println!();
        println!("Install yt-dlp with `pip install yt-dlp` or point --yt-dlp / --python at it.");
    }
    if !report.ffmpeg.is_available() {
        println!();
        println!("Install ffmpeg from your package manager or pass --ffmpeg.");
    }

    if !report.all_available() {
        bail!("Missing required tools");
    }
    Ok(())
}

fn print_tool(tool: &ToolStatus) {
    let status = match (&tool.version, &tool.error) {
        (Some(version), _) => format!("{GREEN}✓ {version}{RESET}"),
        (None, Some(error)) => format!("{RED}✗ {error}{RESET}"),
        (None, None) => format!("{RED}✗ missing{RESET}"),
    };
    println!("{:<8} {:<30} {status}", tool.name, tool.location);
}
