pub mod config;
pub mod logging;

pub mod download;
pub mod error;
pub mod fetcher;
pub mod job;
pub mod joiner;
pub mod probe;
pub mod scheduler;
pub mod segmenter;

pub use download::{clean_scratch, download, download_with_options, scratch_dir, DownloadOptions};
pub use error::{DownloadError, ProbeError, SegmentError};
