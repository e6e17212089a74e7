//! Single ranged GET streamed into a scratch file.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::TransferOptions;
use crate::error::SegmentError;
use crate::segmenter::Segment;

const HTTP_PARTIAL_CONTENT: u32 = 206;

/// Fetches `segment` of `url` into a freshly truncated file at `path` and syncs it.
/// On error the file may hold partial data; the caller discards it.
pub(super) fn fetch_range(
    url: &str,
    segment: &Segment,
    path: &Path,
    opts: &TransferOptions,
) -> Result<(), SegmentError> {
    let file = File::options()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    let mut writer = BufWriter::new(file);
    let expected = segment.len();
    let mut received = 0u64;
    let mut storage_error: Option<io::Error> = None;
    let mut overflow = false;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    opts.apply(&mut easy)?;
    easy.range(&segment.curl_range())?;

    let mut transfer = easy.transfer();
    transfer.write_function(|data| {
        // A body longer than the range means the server sent something else.
        if received + data.len() as u64 > expected {
            received += data.len() as u64;
            overflow = true;
            return Ok(0);
        }
        match writer.write_all(data) {
            Ok(()) => {
                received += data.len() as u64;
                Ok(data.len())
            }
            Err(e) => {
                storage_error = Some(e);
                Ok(0)
            }
        }
    })?;
    let perform_result = transfer.perform();
    drop(transfer);

    if let Err(e) = perform_result {
        if e.is_write_error() {
            if let Some(io_err) = storage_error {
                return Err(SegmentError::Storage(io_err));
            }
            if overflow {
                // An error page longer than the range is still an HTTP error.
                check_status(easy.response_code()?)?;
                return Err(SegmentError::PartialTransfer { expected, received });
            }
        }
        return Err(SegmentError::Curl(e));
    }

    check_status(easy.response_code()?)?;
    if received != expected {
        return Err(SegmentError::PartialTransfer { expected, received });
    }

    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    Ok(())
}

/// Only `206 Partial Content` carries the requested range.
fn check_status(code: u32) -> Result<(), SegmentError> {
    if !(200..300).contains(&code) {
        return Err(SegmentError::Http(code));
    }
    if code != HTTP_PARTIAL_CONTENT {
        return Err(SegmentError::RangeNotHonored(code));
    }
    Ok(())
}
