//! Download entry point: probe, plan, fetch through the worker pool, join.
//!
//! On any error the scratch directory is left in place, so running the same
//! download again skips every segment that already completed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::DownloadError;
use crate::fetcher::{self, TransferOptions};
use crate::job::{self, DownloadJob};
use crate::joiner;
use crate::probe;
use crate::scheduler;
use crate::segmenter::DEFAULT_CHUNK_SIZE;

/// Knobs for [`download_with_options`]. `Default` matches [`download`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    /// Segment size in bytes.
    pub chunk_size: u64,
    /// Parent of per-job scratch directories (None = system temp dir).
    pub scratch_root: Option<PathBuf>,
    pub transfer: TransferOptions,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            scratch_root: None,
            transfer: TransferOptions::default(),
        }
    }
}

impl DownloadOptions {
    pub fn scratch_root(&self) -> PathBuf {
        self.scratch_root
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}

/// Downloads `url` into `destination` with `concurrency` workers and default options.
pub fn download(url: &str, destination: &Path, concurrency: usize) -> Result<(), DownloadError> {
    download_with_options(url, destination, concurrency, &DownloadOptions::default())
}

/// Downloads `url` into `destination` with `concurrency` workers.
///
/// Blocking; call from `spawn_blocking` if used from async code.
pub fn download_with_options(
    url: &str,
    destination: &Path,
    concurrency: usize,
    opts: &DownloadOptions,
) -> Result<(), DownloadError> {
    validate_request(url, concurrency)?;
    ensure_parent_dir(destination)?;

    let content_length =
        probe::probe_content_length(url, &opts.transfer).map_err(|source| DownloadError::Probe {
            url: url.to_string(),
            source,
        })?;

    let job = DownloadJob::new(
        url,
        destination,
        concurrency,
        content_length,
        opts.chunk_size,
        &opts.scratch_root(),
    );
    tracing::info!(
        url,
        content_length = job.content_length(),
        planned_bytes = job.planned_len(),
        segments = job.segments().len(),
        concurrency,
        scratch_dir = %job.scratch_dir().display(),
        "starting download"
    );
    job.ensure_scratch_dir()?;

    let files = scheduler::run_pool(job.segments(), job.concurrency(), |segment| {
        fetcher::fetch_segment(&job, segment, &opts.transfer)
    })?;

    let written = joiner::join_segments(&files, job.destination())?;
    joiner::remove_scratch_dir(job.scratch_dir());
    tracing::info!(
        bytes = written,
        "download complete: {}",
        job.destination().display()
    );
    Ok(())
}

/// Scratch directory a download into `destination` would use.
pub fn scratch_dir(destination: &Path, opts: &DownloadOptions) -> PathBuf {
    job::scratch_dir_for(&opts.scratch_root(), destination)
}

/// Removes the scratch directory (resume cache) for `destination`.
/// Returns `true` if there was one.
pub fn clean_scratch(destination: &Path, opts: &DownloadOptions) -> Result<bool, DownloadError> {
    let dir = scratch_dir(destination, opts);
    match fs::remove_dir_all(&dir) {
        Ok(()) => {
            tracing::info!("removed scratch dir {}", dir.display());
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(DownloadError::Scratch { path: dir, source }),
    }
}

fn validate_request(url: &str, concurrency: usize) -> Result<(), DownloadError> {
    if concurrency == 0 {
        return Err(DownloadError::InvalidRequest(
            "concurrency must be at least 1".to_string(),
        ));
    }
    let parsed = url::Url::parse(url)
        .map_err(|e| DownloadError::InvalidRequest(format!("invalid URL {url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(DownloadError::InvalidRequest(format!(
            "unsupported URL scheme {other:?}"
        ))),
    }
}

fn ensure_parent_dir(destination: &Path) -> Result<(), DownloadError> {
    match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| DownloadError::Destination {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
