//! Throwaway HTTP origin for command tests.

use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub(crate) enum Reply {
    /// 404 for every request.
    NotFound,
    /// Full GETs get `total` zero bytes; range GETs get their 206 headers
    /// and then nothing until the client goes away.
    StallRanges { total: u64 },
}

/// Starts the origin and returns its base URL, e.g. "http://127.0.0.1:4242/".
pub(crate) fn serve(reply: Reply) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}/", listener.local_addr().unwrap());
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            thread::spawn(move || answer(stream, reply));
        }
    });
    base
}

fn answer(mut stream: TcpStream, reply: Reply) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    let request = String::from_utf8_lossy(&buf).to_ascii_lowercase();
    let range = request
        .lines()
        .find_map(|l| l.strip_prefix("range: bytes="))
        .and_then(|r| r.split_once('-'))
        .and_then(|(a, b)| Some((a.trim().parse::<u64>().ok()?, b.trim().parse::<u64>().ok()?)));

    match (reply, range) {
        (Reply::NotFound, _) => {
            let _ = stream.write_all(
                b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            );
        }
        (Reply::StallRanges { total }, Some((first, last))) => {
            let head = format!(
                "HTTP/1.1 206 Partial Content\r\nContent-Length: {}\r\nContent-Range: bytes {}-{}/{}\r\nConnection: close\r\n\r\n",
                last + 1 - first,
                first,
                last,
                total
            );
            let _ = stream.write_all(head.as_bytes());
            thread::sleep(Duration::from_secs(30));
            return;
        }
        (Reply::StallRanges { total }, None) => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nAccept-Ranges: bytes\r\nConnection: close\r\n\r\n",
                total
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(&vec![0u8; total as usize]);
        }
    }
    let _ = stream.shutdown(Shutdown::Write);
}
