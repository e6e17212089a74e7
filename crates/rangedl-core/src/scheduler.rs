//! Bounded worker pool over a pre-populated segment pool.
//!
//! Every segment is queued before any worker starts and nothing is queued
//! afterwards, so neither taking work nor collecting results ever waits:
//! an empty pool ends a worker, an empty result channel ends collection.

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::{Mutex, PoisonError};
use std::thread;

use crate::error::{DownloadError, SegmentError};
use crate::segmenter::Segment;

/// Result of one fetch attempt, keyed by segment index.
#[derive(Debug)]
pub struct SegmentOutcome {
    pub index: usize,
    pub result: Result<PathBuf, SegmentError>,
}

/// Fetches all `segments` with at most `workers` concurrent calls to `fetch`
/// and returns the scratch paths ordered by segment index.
///
/// A worker whose fetch fails reports it and stops taking work; the others
/// keep draining the pool. Once every worker has exited, results are collected
/// in arrival order and the first failure seen aborts with that segment's
/// error, discarding every other outcome. Work finished by other workers in
/// the meantime is not undone: their scratch files stay as cache.
pub fn run_pool<F>(
    segments: &[Segment],
    workers: usize,
    fetch: F,
) -> Result<Vec<PathBuf>, DownloadError>
where
    F: Fn(&Segment) -> Result<PathBuf, SegmentError> + Sync,
{
    let count = segments.len();
    let pending: Mutex<VecDeque<Segment>> = Mutex::new(segments.iter().copied().collect());
    // Sized so that no send can ever block: at most one outcome per segment.
    let (tx, rx) = mpsc::sync_channel::<SegmentOutcome>(count);
    // Surplus workers would find the pool empty and exit immediately.
    let num_workers = workers.min(count);
    tracing::debug!(segments = count, workers = num_workers, "starting worker pool");

    thread::scope(|s| {
        let handles: Vec<_> = (0..num_workers)
            .map(|worker| {
                let tx = tx.clone();
                let pending = &pending;
                let fetch = &fetch;
                s.spawn(move || loop {
                    let next = pending
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .pop_front();
                    let Some(segment) = next else {
                        tracing::trace!(worker, "pool empty, worker exiting");
                        break;
                    };
                    let result = panic::catch_unwind(AssertUnwindSafe(|| fetch(&segment)))
                        .unwrap_or(Err(SegmentError::WorkerPanicked));
                    let failed = result.is_err();
                    if let Err(e) = &result {
                        tracing::debug!(worker, index = segment.index, "segment failed: {}", e);
                    }
                    let _ = tx.send(SegmentOutcome {
                        index: segment.index,
                        result,
                    });
                    if failed {
                        break;
                    }
                })
            })
            .collect();
        for handle in handles {
            let _ = handle.join();
        }
    });
    drop(tx);

    let mut files: Vec<Option<PathBuf>> = vec![None; count];
    while let Ok(outcome) = rx.try_recv() {
        let index = outcome.index;
        match outcome.result {
            Ok(path) => {
                if let Some(slot) = files.get_mut(index) {
                    *slot = Some(path);
                }
            }
            Err(source) => return Err(DownloadError::SegmentFetch { index, source }),
        }
    }

    files
        .into_iter()
        .enumerate()
        .map(|(index, file)| {
            file.ok_or(DownloadError::SegmentFetch {
                index,
                source: SegmentError::Unreported,
            })
        })
        .collect()
}
