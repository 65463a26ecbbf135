//! Download pipeline shared by `fetch` and `get`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use wdl_core::config::WdlConfig;
use wdl_core::locator::filename_from_url;
use wdl_core::storage::temp_path;
use wdl_core::{
    cancel_on_signals, resolve_output_dir, CancelToken, DownloadError, Downloader, NullSink,
    ProgressSink, ShutdownSignal, TextReporter,
};

const SIGNALS: &[ShutdownSignal] = &[
    ShutdownSignal::Interrupt,
    ShutdownSignal::Terminate,
    ShutdownSignal::Quit,
];

/// Downloads `url` into the configured output folder. Ctrl-C, SIGTERM and
/// SIGQUIT cancel the transfer.
pub(super) async fn transfer(cfg: &WdlConfig, url: &str) -> Result<PathBuf> {
    let cancel = cancel_on_signals(SIGNALS).context("installing signal handlers")?;
    transfer_with(cfg, url, cancel).await
}

/// [`transfer`] with an explicit cancel token. On any failure the partial
/// file is removed.
pub(super) async fn transfer_with(cfg: &WdlConfig, url: &str, cancel: CancelToken) -> Result<PathBuf> {
    let dir = resolve_output_dir(cfg.output_dir.as_deref())?;
    let downloader = Downloader::from_config(cfg);
    let quiet = cfg.quiet;

    let task_url = url.to_string();
    let task_dir = dir.clone();
    let result = tokio::task::spawn_blocking(move || {
        let sink: Box<dyn ProgressSink> = if quiet {
            Box::new(NullSink)
        } else {
            Box::new(TextReporter::stdout())
        };
        downloader.download(&cancel, sink.as_ref(), &task_url, &task_dir)
    })
    .await
    .context("download task failed")?;

    match result {
        Ok(path) => Ok(path),
        Err(err) => {
            remove_partial(&dir, url);
            if matches!(err, DownloadError::Cancelled) {
                eprintln!("Interrupted");
            } else if err.is_timeout() {
                eprintln!("Timeout downloading {}", url);
            }
            Err(err).with_context(|| format!("downloading {}", url))
        }
    }
}

fn remove_partial(dir: &Path, url: &str) {
    let Some(name) = filename_from_url(url) else {
        return;
    };
    let partial = temp_path(&dir.join(name));
    match std::fs::remove_file(&partial) {
        Ok(()) => tracing::debug!(path = %partial.display(), "removed partial file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %partial.display(), "could not remove partial file: {}", e),
    }
}
