//! Metadata request for a download.
//!
//! Issues a plain GET (some model hosts answer HEAD differently from GET),
//! collects the response headers of the final hop, and aborts the transfer as
//! soon as the body starts. The status decides whether the job goes ahead;
//! `Content-Length` becomes the total size to partition.

mod parse;

pub(crate) use parse::{parse_content_range, parse_http_status, HeaderLines};
pub use parse::parse_headers;

use std::str;

use crate::cancel::CancelToken;
use crate::downloader::CurlOptions;
use crate::error::DownloadError;

/// Response metadata needed to plan a partitioned download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// Status code of the final response (after redirects).
    pub status: u32,
    /// Total size in bytes, if `Content-Length` is present.
    pub content_length: Option<u64>,
    /// True if server sent `Accept-Ranges: bytes`.
    pub accept_ranges: bool,
}

/// Performs the metadata GET and returns parsed headers.
///
/// Follows redirects. Connection-level failures map to `RequestFailed`,
/// non-2xx statuses to `TransferFailed`. Blocks the current thread until the
/// headers arrive or `cancel` fires (`Cancelled`).
pub fn probe(
    url: &str,
    curl: &CurlOptions,
    cancel: &CancelToken,
) -> Result<ProbeResult, DownloadError> {
    let request_failed = |source: curl::Error| DownloadError::RequestFailed {
        url: url.to_string(),
        source,
    };
    let mut headers = HeaderLines::default();

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(request_failed)?;
    easy.get(true).map_err(request_failed)?;
    curl.apply(&mut easy).map_err(request_failed)?;
    easy.progress(true).map_err(request_failed)?;

    {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    headers.push(s);
                }
                true
            })
            .map_err(request_failed)?;
        // Ticks while connecting and waiting for the status line too.
        transfer
            .progress_function(|_, _, _, _| !cancel.is_cancelled())
            .map_err(request_failed)?;
        // The body is fetched by the range workers; stop at the first chunk.
        transfer.write_function(|_| Ok(0)).map_err(request_failed)?;
        match transfer.perform() {
            Ok(()) => {}
            Err(_) if cancel.is_cancelled() => return Err(DownloadError::Cancelled),
            Err(e) if e.is_write_error() => {}
            Err(e) => return Err(request_failed(e)),
        }
    }

    let code = easy.response_code().map_err(request_failed)?;
    if !(200..300).contains(&code) {
        return Err(DownloadError::TransferFailed {
            url: url.to_string(),
            status: code,
        });
    }

    let mut result = parse_headers(headers.lines());
    result.status = code;
    tracing::debug!(
        url,
        status = code,
        content_length = ?result.content_length,
        accept_ranges = result.accept_ranges,
        "probe complete"
    );
    Ok(result)
}
