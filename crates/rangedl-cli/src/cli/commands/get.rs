//! `rangedl get <url> <dest>` – download with concurrent range requests.

use anyhow::{Context, Result};
use rangedl_core::config::RangedlConfig;
use rangedl_core::download_with_options;
use std::path::PathBuf;
use std::time::Instant;

pub async fn run_get(
    cfg: &RangedlConfig,
    url: String,
    dest: PathBuf,
    concurrency: Option<usize>,
) -> Result<()> {
    let concurrency = concurrency.unwrap_or(cfg.concurrency);
    let opts = cfg.download_options();
    let started = Instant::now();
    tracing::info!(url = %url, dest = %dest.display(), concurrency, "get");

    let target = dest.clone();
    let result =
        tokio::task::spawn_blocking(move || download_with_options(&url, &dest, concurrency, &opts))
            .await
            .context("download task failed to complete")?;
    if let Err(e) = &result {
        if let Some(index) = e.segment_index() {
            tracing::warn!(index, "segment failed; completed segments are cached for the next run");
        }
    }
    result?;

    println!(
        "Downloaded {} in {:.1}s",
        target.display(),
        started.elapsed().as_secs_f64()
    );
    Ok(())
}
