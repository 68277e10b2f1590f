//! Batch download handler.

use std::path::Path;

use anyhow::{Context, Result, bail};
use vidgrab_core::{parse_url_list, run_batch};

use super::cancel_on_ctrl_c;
use crate::bootstrap::CliContext;
use crate::commands::DownloadOptions;
use crate::presentation::TerminalProgress;

/// URLs from `file` (if any) followed by those given on the command line.
pub fn collect_urls(file: Option<&Path>, urls: &[String]) -> Result<Vec<String>> {
    let mut all = match file {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read URL list {}", path.display()))?;
            parse_url_list(&text)
        }
        None => Vec::new(),
    };
    all.extend(parse_url_list(&urls.join("\n")));
    Ok(all)
}

/// Download every URL in sequence and print a summary.
///
/// Fails only when nothing succeeded.
pub async fn execute(
    ctx: &CliContext,
    file: Option<&Path>,
    urls: &[String],
    options: &DownloadOptions,
) -> Result<()> {
    let urls = collect_urls(file, urls)?;
    if urls.is_empty() {
        bail!("No URLs given. Pass URLs as arguments or use --file");
    }

    // Options are checked once; URLs are validated per item
    let template = options.to_request("")?;
    let progress = TerminalProgress::new();

    let summary = run_batch(
        ctx.downloader.as_ref(),
        &template,
        &urls,
        &progress,
        &progress,
        cancel_on_ctrl_c(),
    )
    .await;

    println!();
    println!("{}", summary.message());
    for filename in summary.items.iter().filter_map(|i| i.filename.as_ref()) {
        println!("  {}", ctx.config.downloads_dir.join(filename).display());
    }

    if summary.succeeded() == 0 {
        bail!("No downloads succeeded");
    }
    Ok(())
}
