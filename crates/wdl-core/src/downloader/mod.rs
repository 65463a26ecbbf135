//! Partitioned downloader.
//!
//! Probes the URL with a GET, skips the job when a non-empty file is already
//! in place, otherwise splits the body into `part_count` byte ranges and
//! fetches them on parallel connections into one `.part` file. Every worker
//! writes at its own offset; nothing is buffered beyond one receive chunk.
//! The file is renamed into place only after every range arrived in full.

mod counters;
mod outcome;
mod part;
mod run;

pub use counters::TransferCounters;
pub use outcome::PartOutcome;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::cancel::CancelToken;
use crate::config::WdlConfig;
use crate::error::{DownloadError, PartError, ResolutionError};
use crate::locator::filename_from_url;
use crate::output_dir::validate_dir;
use crate::partition::plan_parts;
use crate::probe::probe;
use crate::progress::{NullSink, ProgressEvent, ProgressSink};
use crate::retry::RetryPolicy;
use crate::storage::{self, StorageWriter};

const USER_AGENT: &str = concat!("wdl/", env!("CARGO_PKG_VERSION"));

/// Transfer settings applied to every request of a job, probe included.
#[derive(Debug, Clone, Copy)]
pub struct CurlOptions {
    /// Whole-request timeout, the same for the probe and each part.
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Receive buffer per connection; bounds memory per worker.
    pub buffer_size: usize,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30 * 60),
            connect_timeout: Duration::from_secs(30),
            buffer_size: 64 * 1024,
        }
    }
}

impl CurlOptions {
    pub(crate) fn apply(&self, easy: &mut curl::easy::Easy) -> Result<(), curl::Error> {
        easy.useragent(USER_AGENT)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.connect_timeout)?;
        // Abort if throughput stays below 1 KiB/s for a minute.
        easy.low_speed_limit(1024)?;
        easy.low_speed_time(Duration::from_secs(60))?;
        easy.timeout(self.timeout)?;
        easy.buffer_size(self.buffer_size)?;
        Ok(())
    }
}

/// Knobs of a partitioned download.
#[derive(Debug, Clone, Copy)]
pub struct DownloadOptions {
    pub curl: CurlOptions,
    /// Number of parallel range requests.
    pub part_count: usize,
    /// Interval between progress snapshots.
    pub report_interval: Duration,
    pub retry: RetryPolicy,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            curl: CurlOptions::default(),
            part_count: 5,
            report_interval: Duration::from_secs(5),
            retry: RetryPolicy::default(),
        }
    }
}

impl DownloadOptions {
    pub fn from_config(cfg: &WdlConfig) -> Self {
        Self {
            curl: CurlOptions {
                timeout: cfg.timeout(),
                connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
                buffer_size: cfg.buffer_bytes,
            },
            part_count: cfg.part_count.max(1),
            report_interval: Duration::from_secs(cfg.report_interval_secs.max(1)),
            retry: cfg.retry_policy(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Downloader {
    options: DownloadOptions,
}

impl Downloader {
    pub fn new(options: DownloadOptions) -> Self {
        Self { options }
    }

    pub fn from_config(cfg: &WdlConfig) -> Self {
        Self::new(DownloadOptions::from_config(cfg))
    }

    /// Downloads `url` into `dest_dir` and returns the local path.
    ///
    /// An existing non-empty file at the destination is returned as is, with
    /// no range requests. Blocks the calling thread until every part has
    /// finished; call it from a blocking context. On failure or cancellation
    /// the `<name>.part` file is left behind for the caller to remove.
    pub fn download(
        &self,
        cancel: &CancelToken,
        sink: &dyn ProgressSink,
        url: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf, DownloadError> {
        validate_dir(dest_dir)?;
        let file_name =
            filename_from_url(url).ok_or_else(|| ResolutionError::NoFileName(url.to_string()))?;
        if cancel.is_cancelled() {
            return Err(DownloadError::Cancelled);
        }

        let head = probe(url, &self.options.curl, cancel)?;
        let dest = dest_dir.join(&file_name);

        if let Ok(meta) = fs::metadata(&dest) {
            if meta.is_file() && meta.len() > 0 {
                tracing::info!(url, path = %dest.display(), size = meta.len(), "already present, skipping");
                sink.on_event(&ProgressEvent::Skipping { url, path: &dest });
                return Ok(dest);
            }
        }

        let total = match head.content_length {
            Some(n) if n > 0 => n,
            _ => {
                return Err(DownloadError::UnknownSize {
                    url: url.to_string(),
                })
            }
        };

        // Some origins serve ranges without advertising them; the workers
        // check every response anyway.
        if !head.accept_ranges {
            tracing::warn!(url, "origin does not advertise byte ranges");
        }

        let tmp = storage::temp_path(&dest);
        let writer = StorageWriter::create(&tmp).map_err(|e| DownloadError::storage(&tmp, e))?;
        let parts = plan_parts(total, self.options.part_count.max(1));
        let counters = TransferCounters::new(&parts);

        tracing::info!(url, path = %dest.display(), total, parts = parts.len(), "download started");
        sink.on_event(&ProgressEvent::Downloading {
            url,
            dir: dest_dir,
            total_bytes: total,
            part_count: parts.len(),
        });

        let started = Instant::now();
        let job = run::PartJob {
            url,
            storage: &writer,
            counters: &counters,
            cancel,
            curl: &self.options.curl,
            retry: &self.options.retry,
        };
        let outcomes = run::run_parts(&job, &parts, sink, self.options.report_interval, started);
        let received = counters.total();

        let failures = outcome::failures(outcomes);
        if !failures.is_empty() {
            let all_cancelled = failures
                .iter()
                .all(|(_, e)| matches!(e, PartError::Cancelled));
            if cancel.is_cancelled() || all_cancelled {
                tracing::info!(url, received, total, "download cancelled");
                return Err(DownloadError::Cancelled);
            }
            tracing::warn!(url, received, total, failed = failures.len(), "download incomplete");
            return Err(DownloadError::PartialTransfer {
                expected: total,
                received,
                failures,
            });
        }

        let on_disk = writer.len().map_err(|e| DownloadError::storage(&tmp, e))?;
        if on_disk != total || received != total {
            tracing::warn!(url, on_disk, received, total, "size mismatch after transfer");
            return Err(DownloadError::PartialTransfer {
                expected: total,
                received: on_disk.min(received),
                failures: Vec::new(),
            });
        }

        writer.sync().map_err(|e| DownloadError::storage(&tmp, e))?;
        writer
            .finalize(&dest)
            .map_err(|e| DownloadError::storage(&dest, e))?;

        let elapsed_secs = started.elapsed().as_secs_f64();
        tracing::info!(url, path = %dest.display(), bytes = total, elapsed_secs, "download complete");
        sink.on_event(&ProgressEvent::Completed {
            path: &dest,
            bytes: total,
            elapsed_secs,
        });
        Ok(dest)
    }
}

/// Downloads `url` into `dest_dir` with default options.
pub fn download(
    cancel: &CancelToken,
    sink: &dyn ProgressSink,
    url: &str,
    dest_dir: &Path,
) -> Result<PathBuf, DownloadError> {
    Downloader::default().download(cancel, sink, url, dest_dir)
}

/// [`download`] without progress output.
pub fn download_quiet(cancel: &CancelToken, url: &str, dest_dir: &Path) -> Result<PathBuf, DownloadError> {
    download(cancel, &NullSink, url, dest_dir)
}
