//! Shared test utilities for integration tests
//!
//! Provides a loopback stub of the verification authority and helpers for
//! building frames with a pinned operating mode.

use slothframe::config::VerificationConfig;
use slothframe::gate::{Authority, ModeSignal};
use slothframe::hasher::digest;
use slothframe::Row;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Token whose digest is installed as the dev reference in test authorities.
pub const DEV_TOKEN: &str = "sloth-dev-override";

/// A running stub authority answering every request with a fixed status.
pub struct StubAuthority {
    pub url: String,
    hits: Arc<AtomicUsize>,
    bodies: Arc<Mutex<Vec<String>>>,
}

impl StubAuthority {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn bodies(&self) -> Vec<String> {
        self.bodies.lock().unwrap().clone()
    }
}

/// Start a stub that replies with `status` to every request.
pub async fn spawn_stub(status: u16) -> StubAuthority {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/verify", listener.local_addr().unwrap());
    let hits = Arc::new(AtomicUsize::new(0));
    let bodies = Arc::new(Mutex::new(Vec::new()));

    let task_hits = Arc::clone(&hits);
    let task_bodies = Arc::clone(&bodies);
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let body = read_request_body(&mut socket).await;
            task_hits.fetch_add(1, Ordering::SeqCst);
            task_bodies.lock().unwrap().push(body);
            let response = format!(
                "HTTP/1.1 {} Stub\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                status
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    StubAuthority { url, hits, bodies }
}

/// Start a listener that accepts connections and never answers.
pub async fn spawn_silent() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/verify", listener.local_addr().unwrap());
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    url
}

/// An address nothing is listening on.
pub async fn closed_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/verify", addr)
}

async fn read_request_body(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(header_end) = find_header_end(&buf) {
            let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
            let content_length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                let body = &buf[header_end + 4..header_end + 4 + content_length];
                return String::from_utf8_lossy(body).to_string();
            }
        }
    }
    String::new()
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

/// Authority with a pinned mode, a known dev token and the given endpoint.
pub fn authority(mode: Option<&str>, endpoint: Option<String>, timeout_secs: u64) -> Arc<Authority> {
    let config = VerificationConfig {
        endpoint,
        timeout_secs,
        ..VerificationConfig::default()
    };
    let client = slothframe::verification::HttpVerificationClient::new(&config).unwrap();
    Arc::new(
        Authority::new(Arc::new(client))
            .with_mode_signal(ModeSignal::Fixed(mode.map(str::to_string)))
            .with_dev_reference(digest(DEV_TOKEN)),
    )
}

pub fn people() -> Vec<Row> {
    vec![
        Row::new().with("id", 1).with("name", "ada").with("team", "core"),
        Row::new().with("id", 2).with("name", "grace").with("team", "infra"),
        Row::new().with("id", 3).with("name", "linus").with("team", "core"),
    ]
}
