//! Retry loop: run a closure until success, cancellation, or policy says stop.

use super::classify;
use super::policy::{RetryDecision, RetryPolicy};
use crate::cancel::CancelToken;
use crate::error::PartError;

/// Runs `f` until it succeeds or the policy gives up. Backoff waits on the
/// cancel token, so cancellation ends the loop with `PartError::Cancelled`
/// instead of sleeping out the delay.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, cancel: &CancelToken, mut f: F) -> Result<T, PartError>
where
    F: FnMut(u32) -> Result<T, PartError>,
{
    let mut attempt = 1u32;
    loop {
        match f(attempt) {
            Ok(v) => return Ok(v),
            Err(e) => {
                let kind = classify::classify(&e);
                match policy.decide(attempt, kind) {
                    RetryDecision::NoRetry => return Err(e),
                    RetryDecision::RetryAfter(d) => {
                        tracing::warn!(attempt, ?kind, delay_ms = d.as_millis() as u64, "retrying: {}", e);
                        if cancel.wait_timeout(d) {
                            return Err(PartError::Cancelled);
                        }
                        attempt += 1;
                    }
                }
            }
        }
    }
}
