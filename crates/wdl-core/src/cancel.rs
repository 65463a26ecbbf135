//! Cooperative cancellation shared by every range worker.
//!
//! A [`CancelToken`] is a one-shot broadcast flag: the first `cancel()` flips
//! it, later calls are no-ops. Workers poll `is_cancelled()` from their curl
//! callbacks; retry backoff sleeps through `wait_timeout` so a cancel wakes
//! them immediately. [`cancel_on_signals`] wires the token to process signals.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    lock: Mutex<()>,
    cond: Condvar,
}

/// Cloneable cancellation handle. `CancelToken::never()` never fires.
#[derive(Debug, Clone)]
pub struct CancelToken {
    inner: Option<Arc<Inner>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self {
            inner: Some(Arc::new(Inner::default())),
        }
    }

    /// A handle that can never be cancelled.
    pub fn never() -> Self {
        Self { inner: None }
    }

    /// Fire the token. Returns true only for the call that actually flipped it.
    pub fn cancel(&self) -> bool {
        let Some(inner) = &self.inner else {
            return false;
        };
        let first = inner
            .cancelled
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if first {
            let _guard = inner.lock.lock().unwrap_or_else(|e| e.into_inner());
            inner.cond.notify_all();
        }
        first
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner
            .as_ref()
            .map(|i| i.cancelled.load(Ordering::Acquire))
            .unwrap_or(false)
    }

    /// Block for up to `timeout`. Returns true if the token was (or became) cancelled.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let Some(inner) = &self.inner else {
            std::thread::sleep(timeout);
            return false;
        };
        let guard = inner.lock.lock().unwrap_or_else(|e| e.into_inner());
        let _ = inner
            .cond
            .wait_timeout_while(guard, timeout, |_| !inner.cancelled.load(Ordering::Acquire));
        self.is_cancelled()
    }
}

/// Process signals that can feed a [`CancelToken`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    /// SIGINT / Ctrl-C.
    Interrupt,
    /// SIGTERM (Unix only).
    Terminate,
    /// SIGQUIT (Unix only).
    Quit,
}

/// Returns a token that is cancelled the first time any of `signals` arrives.
///
/// With an empty slice this is [`CancelToken::never`]. Otherwise it must be
/// called from inside a tokio runtime; the listener runs as a spawned task.
pub fn cancel_on_signals(signals: &[ShutdownSignal]) -> io::Result<CancelToken> {
    if signals.is_empty() {
        return Ok(CancelToken::never());
    }
    let handle = tokio::runtime::Handle::try_current()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    let token = CancelToken::new();
    let mut listeners = Vec::with_capacity(signals.len());
    for &signal in signals {
        // Listeners must be registered on the runtime before this returns.
        let listener = {
            let _enter = handle.enter();
            SignalListener::install(signal)?
        };
        listeners.push(listener);
    }

    for mut listener in listeners {
        let token = token.clone();
        handle.spawn(async move {
            if listener.recv().await && token.cancel() {
                tracing::info!(signal = ?listener.signal, "cancellation requested by signal");
            }
        });
    }
    Ok(token)
}

struct SignalListener {
    signal: ShutdownSignal,
    #[cfg(unix)]
    inner: tokio::signal::unix::Signal,
}

impl SignalListener {
    #[cfg(unix)]
    fn install(signal: ShutdownSignal) -> io::Result<Self> {
        use tokio::signal::unix::{signal as unix_signal, SignalKind};
        let kind = match signal {
            ShutdownSignal::Interrupt => SignalKind::interrupt(),
            ShutdownSignal::Terminate => SignalKind::terminate(),
            ShutdownSignal::Quit => SignalKind::quit(),
        };
        Ok(Self {
            signal,
            inner: unix_signal(kind)?,
        })
    }

    #[cfg(not(unix))]
    fn install(signal: ShutdownSignal) -> io::Result<Self> {
        Ok(Self { signal })
    }

    /// Resolves true when the signal is delivered, false if it never can be.
    #[cfg(unix)]
    async fn recv(&mut self) -> bool {
        self.inner.recv().await.is_some()
    }

    #[cfg(not(unix))]
    async fn recv(&mut self) -> bool {
        match self.signal {
            ShutdownSignal::Interrupt => tokio::signal::ctrl_c().await.is_ok(),
            ShutdownSignal::Terminate | ShutdownSignal::Quit => false,
        }
    }
}
