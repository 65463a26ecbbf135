pub mod config;
pub mod logging;

pub mod cancel;
pub mod downloader;
pub mod error;
pub mod locator;
pub mod output_dir;
pub mod partition;
pub mod probe;
pub mod progress;
pub mod retry;
pub mod storage;

pub use cancel::{cancel_on_signals, CancelToken, ShutdownSignal};
pub use downloader::{download, DownloadOptions, Downloader};
pub use error::{DownloadError, PartError, ResolutionError};
pub use locator::ModelLocator;
pub use output_dir::resolve_output_dir;
pub use progress::{NullSink, ProgressEvent, ProgressSink, ProgressStats, TextReporter};
