//! One HTTP Range GET for one part, written straight into the shared file.

use std::cell::{Cell, RefCell};
use std::io;
use std::str;

use crate::cancel::CancelToken;
use crate::error::PartError;
use crate::partition::Part;
use crate::probe::{parse_content_range, parse_http_status, HeaderLines};
use crate::storage::StorageWriter;

use super::counters::TransferCounters;
use super::CurlOptions;

/// Downloads whatever is still missing of `part` and writes it at the part's
/// offset. Resumes from the bytes already counted for this part, so a retry
/// continues where the previous attempt stopped.
///
/// The response must be `206` with a `Content-Range` starting at the
/// requested offset; anything else is rejected before a byte is written.
pub(super) fn download_one_part(
    url: &str,
    part: &Part,
    storage: &StorageWriter,
    counters: &TransferCounters,
    cancel: &CancelToken,
    curl: &CurlOptions,
) -> Result<(), PartError> {
    let done = counters.part(part.index);
    let Some(range) = part.curl_range(done) else {
        return Ok(());
    };
    let from = part.start + done;
    let remaining = part.end - from;

    let headers = RefCell::new(HeaderLines::default());
    // None until the first body chunk; then whether the response is usable.
    let accepted: Cell<Option<bool>> = Cell::new(None);
    let written = Cell::new(0u64);
    let storage_error: RefCell<Option<io::Error>> = RefCell::new(None);

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.get(true)?;
    curl.apply(&mut easy)?;
    easy.range(&range)?;
    easy.progress(true)?;

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                headers.borrow_mut().push(s);
            }
            true
        })?;
        // Called by curl about once a second even when no data flows.
        transfer.progress_function(|_, _, _, _| !cancel.is_cancelled())?;
        transfer.write_function(|data| {
            if cancel.is_cancelled() {
                return Ok(0);
            }
            let ok = match accepted.get() {
                Some(ok) => ok,
                None => {
                    let ok = range_matches(&headers.borrow(), from, part.end);
                    accepted.set(Some(ok));
                    ok
                }
            };
            let off = written.get();
            let len = data.len() as u64;
            if !ok || off + len > remaining {
                accepted.set(Some(false));
                return Ok(0);
            }
            match storage.write_at(from + off, data) {
                Ok(()) => {
                    written.set(off + len);
                    counters.add(part.index, len);
                    Ok(data.len())
                }
                Err(e) => {
                    *storage_error.borrow_mut() = Some(e);
                    Ok(0)
                }
            }
        })?;

        if let Err(e) = transfer.perform() {
            if cancel.is_cancelled() {
                return Err(PartError::Cancelled);
            }
            if let Some(io_err) = storage_error.borrow_mut().take() {
                return Err(PartError::Storage(io_err));
            }
            if accepted.get() == Some(false) {
                let status = parse_http_status(headers.borrow().lines()).unwrap_or(0);
                return Err(rejected(status));
            }
            return Err(PartError::Curl(e));
        }
    }

    let code = easy.response_code()?;
    if code != 206 {
        return Err(rejected(code));
    }
    // Empty 206 bodies never reach the write callback.
    if accepted.get().is_none() && !range_matches(&headers.borrow(), from, part.end) {
        return Err(PartError::InvalidRangeResponse(code));
    }

    let received = written.get();
    if received != remaining {
        return Err(PartError::PartialTransfer {
            expected: remaining,
            received,
        });
    }
    Ok(())
}

fn range_matches(headers: &HeaderLines, from: u64, end: u64) -> bool {
    parse_http_status(headers.lines()) == Some(206)
        && parse_content_range(headers.lines()) == Some((from, end - 1))
}

fn rejected(status: u32) -> PartError {
    if (200..300).contains(&status) {
        PartError::InvalidRangeResponse(status)
    } else {
        PartError::Http(status)
    }
}
