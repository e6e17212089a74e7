//! Final assembly: concatenate segment files in index order.
//!
//! Segments are appended to a staging file (`<destination>.part`) which is
//! renamed over the destination only once every segment has been copied, so a
//! failed join never leaves a truncated destination behind. Segment files are
//! not deleted one by one: the whole scratch directory goes after the rename.
//!
//! The staging path is owned by the download: an unrelated file already named
//! `<destination>.part` is truncated and overwritten without warning.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::DownloadError;

/// Suffix of the staging file used before the atomic rename.
pub const STAGING_SUFFIX: &str = ".part";

/// Staging path for `destination`: appends `.part` (e.g. `file.iso` → `file.iso.part`).
pub fn staging_path(destination: &Path) -> PathBuf {
    let mut o = destination.as_os_str().to_owned();
    o.push(STAGING_SUFFIX);
    PathBuf::from(o)
}

/// Writes `files` (already in index order) into `destination`.
///
/// On failure the staging file is removed and `destination` is left exactly as
/// it was. Returns the number of bytes written.
pub fn join_segments(files: &[PathBuf], destination: &Path) -> Result<u64, DownloadError> {
    let staging = staging_path(destination);
    let result = write_staging(files, &staging).and_then(|written| {
        fs::rename(&staging, destination)?;
        Ok(written)
    });

    match result {
        Ok(written) => {
            tracing::debug!(
                segments = files.len(),
                bytes = written,
                "joined into {}",
                destination.display()
            );
            Ok(written)
        }
        Err(source) => {
            if let Err(e) = fs::remove_file(&staging) {
                if e.kind() != io::ErrorKind::NotFound {
                    tracing::warn!("could not remove {}: {}", staging.display(), e);
                }
            }
            Err(DownloadError::Join {
                path: destination.to_path_buf(),
                source,
            })
        }
    }
}

fn write_staging(files: &[PathBuf], staging: &Path) -> io::Result<u64> {
    let out = File::options()
        .write(true)
        .create(true)
        .truncate(true)
        .open(staging)?;
    let mut out = BufWriter::new(out);
    let mut written = 0u64;
    for file in files {
        let mut segment = File::open(file)?;
        written += io::copy(&mut segment, &mut out)?;
    }
    out.flush()?;
    out.get_ref().sync_all()?;
    Ok(written)
}

/// Remove a job's scratch directory after a successful join. Failure is logged, not returned.
pub fn remove_scratch_dir(scratch_dir: &Path) {
    match fs::remove_dir_all(scratch_dir) {
        Ok(()) => tracing::debug!("removed scratch dir {}", scratch_dir.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            "could not remove scratch dir {}: {}",
            scratch_dir.display(),
            e
        ),
    }
}
