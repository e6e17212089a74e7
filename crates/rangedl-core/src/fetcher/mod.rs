//! Per-segment fetch with resume from the scratch cache.
//!
//! A segment is atomic: it is either served from a completed scratch file
//! (marker present) or fetched again from its first byte. A failed fetch
//! leaves neither a part file nor a marker behind.

mod cache;
mod transfer;

use std::path::PathBuf;
use std::time::Duration;

use crate::error::SegmentError;
use crate::job::DownloadJob;
use crate::segmenter::Segment;

/// Curl tuning shared by the probe and every segment transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOptions {
    pub connect_timeout: Duration,
    /// Abort if throughput stays below this many bytes/sec for `low_speed_time`.
    pub low_speed_limit: u32,
    pub low_speed_time: Duration,
    /// Receive buffer size (None = libcurl default).
    pub buffer_size: Option<usize>,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            low_speed_limit: 1024,
            low_speed_time: Duration::from_secs(60),
            buffer_size: None,
        }
    }
}

impl TransferOptions {
    pub(crate) fn apply(&self, easy: &mut curl::easy::Easy) -> Result<(), curl::Error> {
        easy.connect_timeout(self.connect_timeout)?;
        // Low-speed abort instead of a wall-clock timeout so large segments on slow links survive.
        easy.low_speed_limit(self.low_speed_limit)?;
        easy.low_speed_time(self.low_speed_time)?;
        if let Some(sz) = self.buffer_size {
            easy.buffer_size(sz)?;
        }
        Ok(())
    }
}

/// Returns the scratch file holding `segment`'s bytes.
///
/// If the segment's marker exists and its scratch file holds exactly the
/// segment's bytes, returns at once with no network access. Otherwise issues a ranged GET, streams it into a fresh
/// scratch file and writes the marker. On failure both files are removed.
pub fn fetch_segment(
    job: &DownloadJob,
    segment: &Segment,
    opts: &TransferOptions,
) -> Result<PathBuf, SegmentError> {
    let part = job.scratch_path(segment);
    let marker = job.marker_path(segment);

    if cache::is_cached(&part, &marker, segment.len())? {
        tracing::debug!(index = segment.index, "segment cached, skipping fetch");
        return Ok(part);
    }

    tracing::debug!(
        index = segment.index,
        range = %segment.range_header_value(),
        "fetching segment"
    );
    let result = transfer::fetch_range(job.url(), segment, &part, opts)
        .and_then(|()| cache::write_marker(&marker).map_err(SegmentError::Storage));

    match result {
        Ok(()) => Ok(part),
        Err(e) => {
            cache::discard(&part, &marker);
            Err(e)
        }
    }
}
