// src/checker/test_server.rs
// =============================================================================
// Test-only HTTP server, so probe and scheduler tests run without touching
// the real network.
//
// - Binds 127.0.0.1:0 and answers every request from a scripted plan:
//   plan(path, nth_hit_for_that_path) -> Reply
// - A Reply carries a status code, an optional artificial delay (to make
//   batches overlap), and an optional Location header (to script redirects)
// - Tracks a total hit count and a max-in-flight watermark, which is what
//   the concurrency-bound tests assert against
// =============================================================================

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// One scripted response.
pub(crate) struct Reply {
    pub status: u16,
    pub delay: Duration,
    pub location: Option<String>,
}

impl Reply {
    pub fn status(status: u16) -> Self {
        Self {
            status,
            delay: Duration::ZERO,
            location: None,
        }
    }

    pub fn delay_ms(mut self, millis: u64) -> Self {
        self.delay = Duration::from_millis(millis);
        self
    }

    pub fn location(mut self, target: &str) -> Self {
        self.location = Some(target.to_string());
        self
    }
}

pub(crate) struct TestServer {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Total requests received so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// The most requests that were ever being served simultaneously.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

/// Starts a scripted server on an ephemeral port.
///
/// The plan receives the request path and how many requests that exact
/// path has already seen, so tests can script "404 first, 200 after".
pub(crate) async fn spawn<F>(plan: F) -> TestServer
where
    F: Fn(&str, usize) -> Reply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let hits = Arc::new(AtomicUsize::new(0));
    let in_flight = Arc::new(AtomicUsize::new(0));
    let max_in_flight = Arc::new(AtomicUsize::new(0));
    let seen_paths: Arc<Mutex<HashMap<String, usize>>> = Arc::default();
    let plan = Arc::new(plan);

    {
        let hits = hits.clone();
        let max_in_flight = max_in_flight.clone();
        tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    break;
                };
                let hits = hits.clone();
                let in_flight = in_flight.clone();
                let max_in_flight = max_in_flight.clone();
                let seen_paths = seen_paths.clone();
                let plan = plan.clone();
                tokio::spawn(async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    max_in_flight.fetch_max(now, Ordering::SeqCst);

                    serve_one(socket, &seen_paths, plan.as_ref()).await;

                    in_flight.fetch_sub(1, Ordering::SeqCst);
                });
            }
        });
    }

    TestServer {
        addr,
        hits,
        max_in_flight,
    }
}

/// A URL on a port nothing listens on, for connection-refused outcomes.
pub(crate) async fn refused_url() -> String {
    // Bind to grab a free port, then close it again before anyone connects
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/unreachable", addr)
}

async fn serve_one<F>(
    mut socket: tokio::net::TcpStream,
    seen_paths: &Mutex<HashMap<String, usize>>,
    plan: &F,
) where
    F: Fn(&str, usize) -> Reply,
{
    // Read until the end of the request headers; probes send no body
    let mut buf = vec![0u8; 4096];
    let mut read = 0;
    loop {
        match socket.read(&mut buf[read..]).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                read += n;
                if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") || read == buf.len() {
                    break;
                }
            }
        }
    }

    // Request line looks like "HEAD /path HTTP/1.1"
    let request = String::from_utf8_lossy(&buf[..read]);
    let path = request
        .split_whitespace()
        .nth(1)
        .unwrap_or("/")
        .to_string();

    let nth = {
        let mut seen = seen_paths.lock().unwrap();
        let counter = seen.entry(path.clone()).or_insert(0);
        let nth = *counter;
        *counter += 1;
        nth
    };

    let reply = plan(&path, nth);
    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }

    let mut response = format!(
        "HTTP/1.1 {} {}\r\ncontent-length: 0\r\nconnection: close\r\n",
        reply.status,
        reason(reply.status)
    );
    if let Some(location) = &reply.location {
        response.push_str(&format!("location: {location}\r\n"));
    }
    response.push_str("\r\n");

    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        301 => "Moved Permanently",
        302 => "Found",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Scripted",
    }
}
