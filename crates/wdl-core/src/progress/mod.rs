//! Progress reporting for downloads.
//!
//! The downloader emits [`ProgressEvent`]s through a single [`ProgressSink`]:
//! lifecycle lines from the calling thread and periodic snapshots from a
//! ticker thread. [`TextReporter`] renders them as free-text lines for a
//! terminal or log stream; [`NullSink`] is quiet mode.

mod stats;
mod ticker;

pub use stats::ProgressStats;
pub(crate) use ticker::Ticker;

use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// Something worth telling the user about a download.
#[derive(Debug, Clone)]
pub enum ProgressEvent<'a> {
    /// The destination already holds a non-empty file; nothing is fetched.
    Skipping { url: &'a str, path: &'a Path },
    /// Range workers are about to start.
    Downloading {
        url: &'a str,
        dir: &'a Path,
        total_bytes: u64,
        part_count: usize,
    },
    /// Periodic snapshot.
    Progress(ProgressStats),
    /// Every part arrived and the file is in place.
    Completed {
        path: &'a Path,
        bytes: u64,
        elapsed_secs: f64,
    },
}

/// Receiver of progress events. Called from the download thread and the
/// ticker thread, so implementations must be `Sync`.
pub trait ProgressSink: Send + Sync {
    fn on_event(&self, event: &ProgressEvent<'_>);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn on_event(&self, _event: &ProgressEvent<'_>) {}
}

/// Writes one human-readable line per event to any writer.
pub struct TextReporter<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> TextReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl TextReporter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ProgressSink for TextReporter<W> {
    fn on_event(&self, event: &ProgressEvent<'_>) {
        let line = format_event(event);
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        // A closed terminal must not abort the download.
        let _ = writeln!(out, "{}", line).and_then(|()| out.flush());
    }
}

const MIB: f64 = 1_048_576.0;

/// Render an event as a single line (no trailing newline).
pub fn format_event(event: &ProgressEvent<'_>) -> String {
    match event {
        ProgressEvent::Skipping { url, path } => {
            format!("Skipping {} as it already exists at {}", url, path.display())
        }
        ProgressEvent::Downloading {
            url,
            dir,
            total_bytes,
            part_count,
        } => format!(
            "Downloading {} to {} ({:.1} MiB in {} parts)",
            url,
            dir.display(),
            *total_bytes as f64 / MIB,
            part_count
        ),
        ProgressEvent::Progress(stats) => {
            let eta = stats
                .eta_secs()
                .map(|s| format!("{:.0}s", s))
                .unwrap_or_else(|| "?".to_string());
            format!(
                "Download progress: {:.2}% ({:.1} / {:.1} MiB, {:.2} MiB/s, ETA {})",
                stats.percent(),
                stats.bytes_done as f64 / MIB,
                stats.total_bytes as f64 / MIB,
                stats.bytes_per_sec() / MIB,
                eta
            )
        }
        ProgressEvent::Completed {
            path,
            bytes,
            elapsed_secs,
        } => format!(
            "Downloaded {} ({} bytes in {:.1}s)",
            path.display(),
            bytes,
            elapsed_secs
        ),
    }
}
