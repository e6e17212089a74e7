//! Error taxonomy for a download job.
//!
//! Nothing here is retried: every error travels up verbatim to the caller,
//! carrying the segment index or path it concerns.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure while learning the resource size.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Curl reported an error (connect, DNS, TLS, ...).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Final response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Server did not send a usable `Content-Length`.
    #[error("server did not report a usable Content-Length")]
    MissingLength,
}

/// Failure of a single segment fetch. The partial scratch file is already gone
/// by the time one of these is returned.
#[derive(Debug, Error)]
pub enum SegmentError {
    #[error("{0}")]
    Curl(#[from] curl::Error),
    #[error("HTTP {0}")]
    Http(u32),
    /// Server answered 2xx but not `206 Partial Content`, so the body is not the range.
    #[error("server answered HTTP {0} instead of 206 Partial Content")]
    RangeNotHonored(u32),
    /// Transfer completed but the byte count does not match the segment length
    /// (server closed early, or ignored the Range header).
    #[error("partial transfer: expected {expected} bytes, got {received}")]
    PartialTransfer { expected: u64, received: u64 },
    /// Scratch file or marker could not be written.
    #[error("storage: {0}")]
    Storage(#[from] io::Error),
    /// Worker thread panicked while fetching.
    #[error("worker panicked")]
    WorkerPanicked,
    /// No outcome was recorded for the segment.
    #[error("segment was never fetched")]
    Unreported,
}

/// Terminating error of [`crate::download::download`].
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("invalid download request: {0}")]
    InvalidRequest(String),

    /// Parent directory of the destination could not be created.
    #[error("cannot create destination directory {}: {source}", .path.display())]
    Destination {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("probe {url} failed: {source}")]
    Probe {
        url: String,
        #[source]
        source: ProbeError,
    },

    #[error("scratch directory {}: {source}", .path.display())]
    Scratch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("segment {index} failed: {source}")]
    SegmentFetch {
        index: usize,
        #[source]
        source: SegmentError,
    },

    #[error("join into {} failed: {source}", .path.display())]
    Join {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DownloadError {
    /// Segment index for `SegmentFetch`, else `None`.
    pub fn segment_index(&self) -> Option<usize> {
        match self {
            DownloadError::SegmentFetch { index, .. } => Some(*index),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn segment_fetch_message_names_index() {
        let e = DownloadError::SegmentFetch {
            index: 7,
            source: SegmentError::Http(404),
        };
        assert_eq!(e.to_string(), "segment 7 failed: HTTP 404");
        assert_eq!(e.segment_index(), Some(7));
        assert!(e.source().is_some());
    }

    #[test]
    fn partial_transfer_message() {
        let e = SegmentError::PartialTransfer {
            expected: 10,
            received: 4,
        };
        assert_eq!(e.to_string(), "partial transfer: expected 10 bytes, got 4");
    }

    #[test]
    fn join_message_names_path() {
        let e = DownloadError::Join {
            path: PathBuf::from("/tmp/out.bin"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(e.to_string(), "join into /tmp/out.bin failed: gone");
        assert_eq!(e.segment_index(), None);
    }
}
