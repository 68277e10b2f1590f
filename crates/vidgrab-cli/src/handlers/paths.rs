//! Paths command handler.
//!
//! Prints resolved directories and tools in `key = value` form.

use anyhow::Result;
use vidgrab_core::data_root;

use crate::bootstrap::CliContext;

/// Execute the paths command.
pub fn execute(ctx: &CliContext) -> Result<()> {
    let ffmpeg = ctx
        .settings
        .ffmpeg_location
        .as_ref()
        .map_or_else(|| "(PATH)".to_string(), |p| p.display().to_string());

    println!("data_root = {}", data_root()?.display());
    println!("downloads_dir = {}", ctx.config.downloads_dir.display());
    println!("downloader = {}", ctx.settings.launcher.describe());
    println!("ffmpeg = {ffmpeg}");
    Ok(())
}
