//! Periodic progress reporter running beside the range workers.
//!
//! Sleeps on a channel with a timeout rather than polling; each timeout
//! emits one snapshot, closing the channel stops the thread.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{Scope, ScopedJoinHandle};
use std::time::{Duration, Instant};

use super::{ProgressEvent, ProgressSink};
use crate::downloader::TransferCounters;

pub(crate) struct Ticker<'scope> {
    stop: mpsc::Sender<()>,
    handle: ScopedJoinHandle<'scope, ()>,
}

impl<'scope> Ticker<'scope> {
    /// Start reporting `counters` every `interval` until [`Ticker::stop`].
    pub(crate) fn spawn<'env>(
        scope: &'scope Scope<'scope, 'env>,
        counters: &'env TransferCounters,
        sink: &'env dyn ProgressSink,
        interval: Duration,
        started: Instant,
    ) -> Self {
        let (stop, rx) = mpsc::channel::<()>();
        let handle = scope.spawn(move || loop {
            match rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    sink.on_event(&ProgressEvent::Progress(counters.snapshot(started)));
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });
        Ticker { stop, handle }
    }

    pub(crate) fn stop(self) {
        let _ = self.stop.send(());
        if self.handle.join().is_err() {
            tracing::warn!("progress ticker panicked");
        }
    }
}
