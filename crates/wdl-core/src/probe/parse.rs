//! Parse HTTP response header lines.

use super::ProbeResult;

/// Header lines of the current response. A new status line (`HTTP/...`)
/// starts over, so after redirects only the final response remains.
#[derive(Debug, Default)]
pub(crate) struct HeaderLines(Vec<String>);

impl HeaderLines {
    pub(crate) fn push(&mut self, raw: &str) {
        let line = raw.trim_end();
        if line.starts_with("HTTP/") {
            self.0.clear();
        }
        if !line.is_empty() {
            self.0.push(line.to_string());
        }
    }

    pub(crate) fn lines(&self) -> &[String] {
        &self.0
    }
}

/// Parse collected header lines into a ProbeResult. `status` comes from the
/// status line when present, 0 otherwise.
pub fn parse_headers(lines: &[String]) -> ProbeResult {
    let mut content_length = None;
    let mut accept_ranges = false;

    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.parse::<u64>().ok();
            } else if name.eq_ignore_ascii_case("accept-ranges") {
                accept_ranges = value.eq_ignore_ascii_case("bytes");
            }
        }
    }

    ProbeResult {
        status: parse_http_status(lines).unwrap_or(0),
        content_length,
        accept_ranges,
    }
}

/// Status code from the first `HTTP/x y` line.
pub(crate) fn parse_http_status(lines: &[String]) -> Option<u32> {
    lines
        .iter()
        .find(|l| l.starts_with("HTTP/"))
        .and_then(|l| l.split_whitespace().nth(1))
        .and_then(|code| code.parse().ok())
}

/// `(first, last)` byte positions of `Content-Range: bytes first-last/total`.
pub(crate) fn parse_content_range(lines: &[String]) -> Option<(u64, u64)> {
    let value = lines.iter().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        name.trim()
            .eq_ignore_ascii_case("content-range")
            .then(|| value.trim())
    })?;
    let rest = value.strip_prefix("bytes")?.trim();
    let (range, _total) = rest.split_once('/')?;
    let (first, last) = range.split_once('-')?;
    Some((first.trim().parse().ok()?, last.trim().parse().ok()?))
}
