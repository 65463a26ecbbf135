//! Classify HTTP status and curl errors into retry policy error kinds.

use crate::error::PartError;
use crate::retry::policy::ErrorKind;

/// Classify an HTTP status code for retry decisions.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        429 | 503 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Http5xx(code as u16),
        _ => ErrorKind::Other,
    }
}

/// Classify a curl error for retry decisions.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_partial_file()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}

/// Classify a part error into an ErrorKind.
pub fn classify(e: &PartError) -> ErrorKind {
    match e {
        PartError::Curl(ce) => classify_curl_error(ce),
        PartError::Http(code) => classify_http_status(*code),
        PartError::PartialTransfer { .. } => ErrorKind::Connection,
        PartError::InvalidRangeResponse(_)
        | PartError::Storage(_)
        | PartError::Cancelled
        | PartError::WorkerPanicked => ErrorKind::Other,
    }
}
