//! Segment type and fixed-size range planning.

/// Default segment size: 1 MiB.
pub const DEFAULT_CHUNK_SIZE: u64 = 1024 * 1024;

/// A single segment: byte range `[start, end]` (both inclusive) at position `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Position in the resource; orders both offsets and the joined output.
    pub index: usize,
    /// First byte offset (inclusive).
    pub start: u64,
    /// Last byte offset (inclusive).
    pub end: u64,
}

impl Segment {
    /// Length of this segment in bytes.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Curl range string (`start-end`, inclusive, no `bytes=` prefix).
    pub fn curl_range(&self) -> String {
        format!("{}-{}", self.start, self.end)
    }

    /// HTTP Range header value: `bytes=start-end`.
    pub fn range_header_value(&self) -> String {
        format!("bytes={}", self.curl_range())
    }
}

/// Plans whole `chunk_size` segments over a resource of `content_length` bytes.
///
/// Segment `i` covers `[i*chunk_size, (i+1)*chunk_size - 1]`. Planning stops at
/// the first chunk whose last byte would fall at or past `content_length`, so
/// exactly `content_length / chunk_size` segments are produced and a trailing
/// partial chunk is not planned. Returns an empty vec if `chunk_size` is 0.
pub fn plan_segments(content_length: u64, chunk_size: u64) -> Vec<Segment> {
    if chunk_size == 0 {
        return Vec::new();
    }

    let count = content_length / chunk_size;
    let dropped = content_length % chunk_size;
    if dropped > 0 {
        tracing::warn!(
            content_length,
            chunk_size,
            dropped,
            "trailing partial chunk is not planned; output will be {} bytes",
            content_length - dropped
        );
    }

    (0..count)
        .map(|i| {
            let start = i * chunk_size;
            Segment {
                index: i as usize,
                start,
                end: ((i + 1) * chunk_size).min(content_length) - 1,
            }
        })
        .collect()
}
