//! A single download invocation: destination, source, worker count, scratch
//! area and the planned segments.

mod scratch;

pub use scratch::scratch_dir_for;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DownloadError;
use crate::segmenter::{self, Segment};

/// Segment file stem when the destination has no usable file name.
const DEFAULT_FILE_NAME: &str = "download.bin";

/// Suffix of the completion marker next to each segment scratch file.
pub const MARKER_SUFFIX: &str = ".cache";

/// Literal written into every completion marker.
pub const MARKER_CONTENT: &[u8] = b"exist";

/// One download invocation. Segments are planned once at construction and
/// never change; paths for segment files are derived from the scratch dir.
#[derive(Debug, Clone)]
pub struct DownloadJob {
    url: String,
    destination: PathBuf,
    concurrency: usize,
    scratch_dir: PathBuf,
    file_name: String,
    content_length: u64,
    segments: Vec<Segment>,
}

impl DownloadJob {
    /// Plans a job. Pure: touches neither the network nor the filesystem.
    pub fn new(
        url: &str,
        destination: &Path,
        concurrency: usize,
        content_length: u64,
        chunk_size: u64,
        scratch_root: &Path,
    ) -> Self {
        let file_name = destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());

        DownloadJob {
            url: url.to_string(),
            destination: destination.to_path_buf(),
            concurrency,
            scratch_dir: scratch_dir_for(scratch_root, destination),
            file_name,
            content_length,
            segments: segmenter::plan_segments(content_length, chunk_size),
        }
    }

    /// Create the scratch directory if missing. Existing contents are the resume cache.
    pub fn ensure_scratch_dir(&self) -> Result<(), DownloadError> {
        fs::create_dir_all(&self.scratch_dir).map_err(|source| DownloadError::Scratch {
            path: self.scratch_dir.clone(),
            source,
        })
    }

    /// Where the bytes of `segment` are stored: `<scratch>/<file_name>-<index>`.
    pub fn scratch_path(&self, segment: &Segment) -> PathBuf {
        self.scratch_dir
            .join(format!("{}-{}", self.file_name, segment.index))
    }

    /// Completion marker for `segment`: `<scratch_path>.cache`.
    pub fn marker_path(&self, segment: &Segment) -> PathBuf {
        self.scratch_dir.join(format!(
            "{}-{}{}",
            self.file_name, segment.index, MARKER_SUFFIX
        ))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Bytes the joined output will hold (whole chunks only).
    pub fn planned_len(&self) -> u64 {
        self.segments.iter().map(Segment::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(dest: &str, len: u64, chunk: u64) -> DownloadJob {
        DownloadJob::new(
            "http://example.com/f",
            Path::new(dest),
            3,
            len,
            chunk,
            Path::new("/scratch"),
        )
    }

    #[test]
    fn segment_paths_in_scratch_dir() {
        let j = job("/tmp/2/1.mp4", 4096, 1024);
        let seg = j.segments()[1];
        let part = j.scratch_path(&seg);
        let marker = j.marker_path(&seg);
        assert_eq!(part.parent(), Some(j.scratch_dir()));
        assert!(part.to_string_lossy().ends_with("1.mp4-1"));
        assert!(marker.to_string_lossy().ends_with("1.mp4-1.cache"));
        assert!(j
            .scratch_dir()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("rangedl-tmp-2-1.mp4-"));
    }

    #[test]
    fn plans_whole_chunks_only() {
        let j = job("/tmp/out.bin", 2500, 1000);
        assert_eq!(j.segments().len(), 2);
        assert_eq!(j.planned_len(), 2000);
        assert_eq!(j.content_length(), 2500);
        assert_eq!(j.concurrency(), 3);
    }

    #[test]
    fn missing_file_name_falls_back() {
        let j = job("/", 10, 5);
        let seg = j.segments()[0];
        assert!(j
            .scratch_path(&seg)
            .to_string_lossy()
            .ends_with("download.bin-0"));
    }

    #[test]
    fn ensure_scratch_dir_creates_and_keeps_contents() {
        let root = tempfile::tempdir().unwrap();
        let j = DownloadJob::new(
            "http://example.com/f",
            Path::new("/tmp/out.bin"),
            1,
            10,
            5,
            root.path(),
        );
        j.ensure_scratch_dir().unwrap();
        let part = j.scratch_path(&j.segments()[0]);
        std::fs::write(&part, b"hello").unwrap();
        j.ensure_scratch_dir().unwrap();
        assert_eq!(std::fs::read(&part).unwrap(), b"hello");
    }
}
