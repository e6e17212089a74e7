//! Minimal HTTP/1.1 server that supports plain and Range GET for integration tests.
//!
//! Serves a single static body. A plain GET gets `200 OK` with `Content-Length`;
//! a GET with `Range: bytes=X-Y` gets `206 Partial Content`. Ranged requests
//! are counted and can be made to fail by start offset.

use std::collections::HashSet;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct RangeServerOptions {
    /// If false, GET ignores Range and always returns 200 with the full body.
    pub support_ranges: bool,
    /// If false, the plain GET omits `Content-Length` and closes to end the body.
    pub send_content_length: bool,
}

impl Default for RangeServerOptions {
    fn default() -> Self {
        Self {
            support_ranges: true,
            send_content_length: true,
        }
    }
}

#[derive(Default)]
struct Shared {
    ranged_requests: AtomicUsize,
    plain_requests: AtomicUsize,
    failing_starts: Mutex<HashSet<u64>>,
    failure_body: Mutex<Vec<u8>>,
}

/// Handle to a running server. The server runs until the process exits.
pub struct RangeServer {
    pub url: String,
    shared: Arc<Shared>,
}

impl RangeServer {
    /// Number of GETs that carried a Range header.
    pub fn ranged_requests(&self) -> usize {
        self.shared.ranged_requests.load(Ordering::SeqCst)
    }

    /// Number of GETs without a Range header (size probes).
    pub fn plain_requests(&self) -> usize {
        self.shared.plain_requests.load(Ordering::SeqCst)
    }

    /// Ranged requests starting at any of `starts` get `500 Internal Server Error`
    /// (or the 404 page set by `not_found_for_ranges_starting_at`).
    pub fn fail_ranges_starting_at(&self, starts: &[u64]) {
        let mut set = self.shared.failing_starts.lock().unwrap();
        set.clear();
        set.extend(starts.iter().copied());
    }

    /// Ranged requests starting at any of `starts` get `404 Not Found` with `page` as body.
    pub fn not_found_for_ranges_starting_at(&self, starts: &[u64], page: &[u8]) {
        *self.shared.failure_body.lock().unwrap() = page.to_vec();
        self.fail_ranges_starting_at(starts);
    }
}

/// Starts a server in a background thread serving `body`.
pub fn start(body: Vec<u8>) -> RangeServer {
    start_with_options(body, RangeServerOptions::default())
}

/// Like `start` but allows customizing server behavior (ranges ignored, no length).
pub fn start_with_options(body: Vec<u8>, opts: RangeServerOptions) -> RangeServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let shared = Arc::new(Shared::default());
    let server_shared = Arc::clone(&shared);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let shared = Arc::clone(&server_shared);
            thread::spawn(move || handle(stream, &body, opts, &shared));
        }
    });
    RangeServer {
        url: format!("http://127.0.0.1:{}/file.bin", port),
        shared,
    }
}

fn handle(mut stream: TcpStream, body: &[u8], opts: RangeServerOptions, shared: &Shared) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let (method, range) = parse_request(request);
    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nConnection: close\r\n\r\n");
        return;
    }

    let total = body.len() as u64;
    match range {
        Some((start, end_incl)) if opts.support_ranges => {
            shared.ranged_requests.fetch_add(1, Ordering::SeqCst);
            if shared.failing_starts.lock().unwrap().contains(&start) {
                let page = shared.failure_body.lock().unwrap().clone();
                let status = if page.is_empty() {
                    "500 Internal Server Error"
                } else {
                    "404 Not Found"
                };
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    status,
                    page.len()
                );
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.write_all(&page);
                return;
            }
            let end_incl = end_incl.min(total.saturating_sub(1));
            if start > end_incl || start >= total {
                let response = format!(
                    "HTTP/1.1 416 Range Not Satisfiable\r\nContent-Range: bytes */{}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                    total
                );
                let _ = stream.write_all(response.as_bytes());
                return;
            }
            let slice = &body[start as usize..=end_incl as usize];
            let response = format!(
                "HTTP/1.1 206 Partial Content\r\nContent-Length: {}\r\nContent-Range: bytes {}-{}/{}\r\nAccept-Ranges: bytes\r\nConnection: close\r\n\r\n",
                slice.len(),
                start,
                end_incl,
                total
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.write_all(slice);
        }
        other => {
            if other.is_some() {
                shared.ranged_requests.fetch_add(1, Ordering::SeqCst);
            } else {
                shared.plain_requests.fetch_add(1, Ordering::SeqCst);
            }
            let length = if opts.send_content_length {
                format!("Content-Length: {}\r\n", total)
            } else {
                String::new()
            };
            let response = format!("HTTP/1.1 200 OK\r\n{}Connection: close\r\n\r\n", length);
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.write_all(body);
        }
    }
}

/// Returns (method, optional (start, end_inclusive) for Range: bytes=X-Y).
fn parse_request(request: &str) -> (&str, Option<(u64, u64)>) {
    let mut method = "";
    let mut range = None;
    for line in request.lines() {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if method.is_empty() {
            method = line.split_whitespace().next().unwrap_or("");
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("range") {
                let value = value.trim();
                if value.to_lowercase().starts_with("bytes=") {
                    let part = value[6..].trim();
                    if let Some((a, b)) = part.split_once('-') {
                        let start = a.trim().parse::<u64>().unwrap_or(0);
                        let end = b.trim();
                        let end_incl = if end.is_empty() {
                            u64::MAX
                        } else {
                            end.parse::<u64>().unwrap_or(0)
                        };
                        range = Some((start, end_incl));
                    }
                }
            }
        }
    }
    (method, range)
}
