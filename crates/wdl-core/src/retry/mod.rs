//! Retry and backoff policy for range workers.
//!
//! Classifies part failures (timeouts, throttling, connection drops) and
//! decides on exponential backoff, so a transient hiccup on one of the
//! parallel connections does not fail a multi-gigabyte download.

mod classify;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
