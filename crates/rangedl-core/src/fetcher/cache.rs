//! Completion markers: the only resume mechanism.
//!
//! A segment is cached when both its scratch file and its marker exist and the
//! file holds exactly the segment's length. Anything else is leftover from an
//! interrupted run, or from a run planned with another chunk size, and is removed.

use std::fs;
use std::io;
use std::path::Path;

use crate::job::MARKER_CONTENT;

/// True if `part` and `marker` both exist and `part` is `expected_len` bytes.
/// A lone part, a lone marker or a part of the wrong length is deleted so the
/// segment is fetched again from scratch.
pub(super) fn is_cached(part: &Path, marker: &Path, expected_len: u64) -> io::Result<bool> {
    match (part.try_exists()?, marker.try_exists()?) {
        (true, true) => {
            let actual = fs::metadata(part)?.len();
            if actual == expected_len {
                return Ok(true);
            }
            tracing::debug!(
                path = %part.display(),
                actual,
                expected = expected_len,
                "cached segment has wrong length, discarding"
            );
            remove_if_exists(marker)?;
            remove_if_exists(part)?;
            Ok(false)
        }
        (true, false) => {
            tracing::debug!(path = %part.display(), "scratch file without marker, discarding");
            remove_if_exists(part)?;
            Ok(false)
        }
        (false, true) => {
            tracing::debug!(path = %marker.display(), "marker without scratch file, discarding");
            remove_if_exists(marker)?;
            Ok(false)
        }
        (false, false) => Ok(false),
    }
}

/// Write the completion marker. Call only after the part file is fully written and synced.
pub(super) fn write_marker(marker: &Path) -> io::Result<()> {
    fs::write(marker, MARKER_CONTENT)
}

/// Best-effort removal of a failed segment's part file and marker.
pub(super) fn discard(part: &Path, marker: &Path) {
    for path in [marker, part] {
        if let Err(e) = remove_if_exists(path) {
            tracing::warn!(path = %path.display(), "could not remove scratch file: {}", e);
        }
    }
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
