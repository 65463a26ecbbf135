//! Error types for resolution, the metadata request and per-part transfers.

use std::path::PathBuf;
use thiserror::Error;

use crate::retry::{classify, ErrorKind};

/// Failure to turn user input (model name, URL, output directory) into
/// something the downloader can act on.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("no such file or directory: {}", .0.display())]
    NotFound(PathBuf),
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("invalid base URL {url}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("URL has no file name component: {0}")]
    NoFileName(String),
    #[error("cannot determine current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

/// Error returned by a single range worker. Classified by the retry policy
/// before it is folded into a [`DownloadError::PartialTransfer`].
#[derive(Debug, Error)]
pub enum PartError {
    /// Curl reported an error (timeout, connection reset, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Non-2xx response to the range request.
    #[error("HTTP {0}")]
    Http(u32),
    /// 2xx response that is not a 206 for the requested range.
    #[error("origin ignored the range request (HTTP {0})")]
    InvalidRangeResponse(u32),
    /// Stream ended before the whole range arrived.
    #[error("partial transfer: expected {expected} bytes, got {received}")]
    PartialTransfer { expected: u64, received: u64 },
    /// Positional write to the shared file failed. Not retried.
    #[error("storage: {0}")]
    Storage(#[source] std::io::Error),
    #[error("cancelled")]
    Cancelled,
    #[error("worker thread panicked")]
    WorkerPanicked,
}

/// Error of the public download operation.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error(transparent)]
    ResolutionFailed(#[from] ResolutionError),
    /// The metadata request could not be performed at all.
    #[error("GET {url} failed: {source}")]
    RequestFailed {
        url: String,
        #[source]
        source: curl::Error,
    },
    /// The metadata request returned a non-success status.
    #[error("{url}: HTTP {status}")]
    TransferFailed { url: String, status: u32 },
    #[error("{url}: origin did not report a content length")]
    UnknownSize { url: String },
    #[error("{}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// One or more parts did not arrive in full. `failures` holds the index
    /// and final error of every failed part.
    #[error(
        "partial transfer: received {received} of {expected} bytes ({} part(s) failed)",
        .failures.len()
    )]
    PartialTransfer {
        expected: u64,
        received: u64,
        failures: Vec<(usize, PartError)>,
    },
    #[error("download cancelled")]
    Cancelled,
}

impl DownloadError {
    pub(crate) fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DownloadError::Storage {
            path: path.into(),
            source,
        }
    }

    /// True when the job ran out of time: the metadata request timed out, or
    /// every failed part gave up on a timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            DownloadError::RequestFailed { source, .. } => source.is_operation_timedout(),
            DownloadError::PartialTransfer { failures, .. } => {
                !failures.is_empty()
                    && failures
                        .iter()
                        .all(|(_, e)| classify(e) == ErrorKind::Timeout)
            }
            _ => false,
        }
    }
}
