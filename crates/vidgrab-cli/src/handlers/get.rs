//! Single download handler.

use anyhow::Result;
use vidgrab_core::run_download;

use super::cancel_on_ctrl_c;
use crate::bootstrap::CliContext;
use crate::commands::DownloadOptions;
use crate::presentation::TerminalProgress;

/// Download one URL and print where the file was saved.
pub async fn execute(ctx: &CliContext, url: &str, options: &DownloadOptions) -> Result<()> {
    let request = options.to_request(url)?.validate()?;
    let progress = TerminalProgress::new();

    let done = run_download(
        ctx.downloader.as_ref(),
        &request,
        &progress,
        cancel_on_ctrl_c(),
    )
    .await?;

    println!("Saved {}", done.path.display());
    Ok(())
}
