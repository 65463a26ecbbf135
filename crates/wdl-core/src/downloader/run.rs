//! Task group: one scoped thread per part plus the progress ticker.

use std::thread;
use std::time::{Duration, Instant};

use crate::cancel::CancelToken;
use crate::error::PartError;
use crate::partition::Part;
use crate::progress::{ProgressSink, Ticker};
use crate::retry::{run_with_retry, RetryPolicy};
use crate::storage::StorageWriter;

use super::counters::TransferCounters;
use super::outcome::PartOutcome;
use super::part;
use super::CurlOptions;

/// Borrowed state shared by every worker of one job.
pub(super) struct PartJob<'a> {
    pub url: &'a str,
    pub storage: &'a StorageWriter,
    pub counters: &'a TransferCounters,
    pub cancel: &'a CancelToken,
    pub curl: &'a CurlOptions,
    pub retry: &'a RetryPolicy,
}

/// Runs every part concurrently and waits for all of them. Outcomes come back
/// in part order. The ticker reports through `sink` until the last worker
/// has returned.
pub(super) fn run_parts(
    job: &PartJob<'_>,
    parts: &[Part],
    sink: &dyn ProgressSink,
    report_interval: Duration,
    started: Instant,
) -> Vec<PartOutcome> {
    thread::scope(|s| {
        let ticker = Ticker::spawn(s, job.counters, sink, report_interval, started);
        let handles: Vec<_> = parts
            .iter()
            .map(|part| (*part, s.spawn(move || run_part(job, part))))
            .collect();
        let outcomes = handles
            .into_iter()
            .map(|(part, handle)| {
                handle.join().unwrap_or_else(|_| {
                    tracing::error!(part = part.index, "part worker panicked");
                    PartOutcome {
                        part,
                        bytes_written: job.counters.part(part.index),
                        attempts: 0,
                        result: Err(PartError::WorkerPanicked),
                    }
                })
            })
            .collect();
        ticker.stop();
        outcomes
    })
}

fn run_part(job: &PartJob<'_>, part: &Part) -> PartOutcome {
    let mut attempts = 0;
    let result = run_with_retry(job.retry, job.cancel, |attempt| {
        attempts = attempt;
        if job.cancel.is_cancelled() {
            return Err(PartError::Cancelled);
        }
        part::download_one_part(job.url, part, job.storage, job.counters, job.cancel, job.curl)
    });
    let bytes_written = job.counters.part(part.index);
    match &result {
        Ok(()) => tracing::debug!(part = part.index, bytes_written, attempts, "part done"),
        Err(e) => tracing::debug!(part = part.index, bytes_written, attempts, "part failed: {}", e),
    }
    PartOutcome {
        part: *part,
        bytes_written,
        attempts,
        result,
    }
}
