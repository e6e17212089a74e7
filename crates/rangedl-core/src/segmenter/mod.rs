//! Range math and segment planning.
//!
//! Splits a resource into fixed-size, index-tagged byte ranges.

mod range;

pub use range::{plan_segments, Segment, DEFAULT_CHUNK_SIZE};
