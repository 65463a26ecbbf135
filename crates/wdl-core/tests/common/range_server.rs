//! Minimal HTTP/1.1 server for integration tests: plain GET and Range GET.
//!
//! Serves a single static body, one request per connection. Counts requests
//! and records every requested range so tests can assert on traffic.

use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct RangeServerOptions {
    /// If false, GET ignores Range and always returns 200 with the full body.
    pub support_ranges: bool,
    /// Answer every request with 404.
    pub not_found: bool,
    /// Omit `Content-Length` on full-body responses.
    pub omit_length: bool,
    /// Send at most this many body bytes per range response, then close.
    pub truncate_ranges_at: Option<usize>,
    /// Send range bodies in chunks of `.0` bytes with `.1` between chunks.
    pub drip: Option<(usize, Duration)>,
    /// Read the request, then hold the connection open without replying.
    pub stall: bool,
}

impl Default for RangeServerOptions {
    fn default() -> Self {
        Self {
            support_ranges: true,
            not_found: false,
            omit_length: false,
            truncate_ranges_at: None,
            drip: None,
            stall: false,
        }
    }
}

/// Handle to a running server. The server runs until the process exits.
#[derive(Debug, Clone)]
pub struct RangeServer {
    /// Base URL, e.g. "http://127.0.0.1:12345/".
    pub base: String,
    requests: Arc<AtomicUsize>,
    ranges: Arc<Mutex<Vec<(u64, u64)>>>,
}

impl RangeServer {
    /// URL of `name` on this server (any path serves the same body).
    pub fn url(&self, name: &str) -> String {
        format!("{}{}", self.base, name)
    }

    /// All requests received so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Requests that carried a `Range` header.
    pub fn range_requests(&self) -> usize {
        self.ranges.lock().unwrap().len()
    }

    /// Requested `(first, last)` byte positions, sorted.
    pub fn ranges(&self) -> Vec<(u64, u64)> {
        let mut r = self.ranges.lock().unwrap().clone();
        r.sort_unstable();
        r
    }
}

pub fn start(body: Vec<u8>) -> RangeServer {
    start_with_options(body, RangeServerOptions::default())
}

pub fn start_with_options(body: Vec<u8>, opts: RangeServerOptions) -> RangeServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let server = RangeServer {
        base: format!("http://127.0.0.1:{}/", port),
        requests: Arc::new(AtomicUsize::new(0)),
        ranges: Arc::new(Mutex::new(Vec::new())),
    };
    let body = Arc::new(body);
    let state = server.clone();
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let state = state.clone();
            thread::spawn(move || handle(stream, &body, opts, &state));
        }
    });
    server
}

fn handle(mut stream: TcpStream, body: &[u8], opts: RangeServerOptions, state: &RangeServer) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let Some(request) = read_request(&mut stream) else {
        return;
    };
    let range = parse_range(&request);
    state.requests.fetch_add(1, Ordering::SeqCst);
    if let Some(r) = range {
        state.ranges.lock().unwrap().push(r);
    }

    if opts.stall {
        thread::sleep(Duration::from_secs(30));
        return;
    }

    if opts.not_found {
        let msg = b"not found";
        let head = format!(
            "HTTP/1.1 404 Not Found\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            msg.len()
        );
        let _ = stream.write_all(head.as_bytes());
        let _ = stream.write_all(msg);
        let _ = stream.shutdown(Shutdown::Write);
        return;
    }

    let total = body.len() as u64;
    match range.filter(|_| opts.support_ranges) {
        Some((start, end_incl)) => {
            let end_incl = end_incl.min(total.saturating_sub(1));
            if start > end_incl {
                let head = format!(
                    "HTTP/1.1 416 Range Not Satisfiable\r\nContent-Range: bytes */{}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                    total
                );
                let _ = stream.write_all(head.as_bytes());
                let _ = stream.shutdown(Shutdown::Write);
                return;
            }
            let slice = &body[start as usize..=end_incl as usize];
            let head = format!(
                "HTTP/1.1 206 Partial Content\r\nContent-Length: {}\r\nContent-Range: bytes {}-{}/{}\r\nAccept-Ranges: bytes\r\nConnection: close\r\n\r\n",
                slice.len(),
                start,
                end_incl,
                total
            );
            if stream.write_all(head.as_bytes()).is_err() {
                return;
            }
            let sent = match opts.truncate_ranges_at {
                Some(n) => &slice[..n.min(slice.len())],
                None => slice,
            };
            write_body(&mut stream, sent, opts.drip);
        }
        None => {
            let length = if opts.omit_length {
                String::new()
            } else {
                format!("Content-Length: {}\r\n", total)
            };
            let accept = if opts.support_ranges {
                "Accept-Ranges: bytes\r\n"
            } else {
                ""
            };
            let head = format!(
                "HTTP/1.1 200 OK\r\n{}{}Connection: close\r\n\r\n",
                length, accept
            );
            if stream.write_all(head.as_bytes()).is_err() {
                return;
            }
            write_body(&mut stream, body, opts.drip);
        }
    }
    let _ = stream.shutdown(Shutdown::Write);
}

fn write_body(stream: &mut TcpStream, data: &[u8], drip: Option<(usize, Duration)>) {
    match drip {
        Some((chunk, pause)) => {
            for piece in data.chunks(chunk.max(1)) {
                if stream.write_all(piece).is_err() {
                    return;
                }
                thread::sleep(pause);
            }
        }
        None => {
            let _ = stream.write_all(data);
        }
    }
}

/// Reads until the end of the request headers.
fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    String::from_utf8(buf).ok()
}

/// `(start, end_inclusive)` from `Range: bytes=X-Y`; open ends run to `u64::MAX`.
fn parse_range(request: &str) -> Option<(u64, u64)> {
    request.lines().skip(1).find_map(|line| {
        let (name, value) = line.split_once(':')?;
        if !name.trim().eq_ignore_ascii_case("range") {
            return None;
        }
        let bytes = value.trim().strip_prefix("bytes=")?;
        let (a, b) = bytes.split_once('-')?;
        let start = a.trim().parse::<u64>().ok()?;
        let end = b.trim();
        let end_incl = if end.is_empty() {
            u64::MAX
        } else {
            end.parse::<u64>().ok()?
        };
        Some((start, end_incl))
    })
}
