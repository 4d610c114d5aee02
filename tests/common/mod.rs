//! Shared utilities for relay integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use image_relay::{HttpServer, RelayConfig, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

pub const RELAY_PATH: &str = "/api/proxy/image";

/// A canned upstream response.
#[derive(Clone)]
pub struct Canned {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub body: Vec<u8>,
}

impl Canned {
    pub fn image(content_type: &'static str, body: Vec<u8>) -> Self {
        Self { status: 200, content_type: Some(content_type), body }
    }

    pub fn status(status: u16) -> Self {
        Self { status, content_type: Some("text/plain"), body: b"nope".to_vec() }
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        206 => "Partial Content",
        404 => "Not Found",
        410 => "Gone",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// Read until the end of the request head so closing the socket does not
/// reset the connection.
async fn read_request_head(socket: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
}

/// Start an upstream that answers every request with `canned`.
/// Returns its address and a hit counter.
pub async fn start_upstream(canned: Canned) -> (SocketAddr, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else { break };
            let canned = canned.clone();
            counter.fetch_add(1, Ordering::SeqCst);

            tokio::spawn(async move {
                read_request_head(&mut socket).await;

                let mut head = format!(
                    "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n",
                    canned.status,
                    reason(canned.status),
                    canned.body.len()
                );
                if let Some(ct) = canned.content_type {
                    head.push_str(&format!("Content-Type: {}\r\n", ct));
                }
                head.push_str("\r\n");

                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(&canned.body).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, hits)
}

/// Start an upstream that streams an endless chunked `image/png` body.
/// The receiver fires once a write fails, i.e. the relay hung up.
pub async fn start_endless_upstream() -> (SocketAddr, oneshot::Receiver<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (closed_tx, closed_rx) = oneshot::channel();

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else { return };
        read_request_head(&mut socket).await;

        let head = "HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nTransfer-Encoding: chunked\r\n\r\n";
        if socket.write_all(head.as_bytes()).await.is_err() {
            let _ = closed_tx.send(());
            return;
        }

        let mut chunk = b"400\r\n".to_vec();
        chunk.extend(std::iter::repeat(0xAB).take(0x400));
        chunk.extend_from_slice(b"\r\n");

        // Give up after ~10s so a broken relay fails the test instead of hanging it.
        for _ in 0..500 {
            if socket.write_all(&chunk).await.is_err() || socket.flush().await.is_err() {
                let _ = closed_tx.send(());
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    });

    (addr, closed_rx)
}

/// Start an upstream that accepts connections and reads the request but
/// never answers.
pub async fn start_silent_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else { break };
            tokio::spawn(async move {
                read_request_head(&mut socket).await;
                tokio::time::sleep(Duration::from_secs(60)).await;
                drop(socket);
            });
        }
    });

    addr
}

/// An address nothing listens on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Config suitable for tests: local upstreams, short timeouts.
pub fn test_config() -> RelayConfig {
    let mut config = RelayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.relay.upstream_timeout_secs = 5;
    config.relay.use_system_proxy = false;
    config
}

/// A relay running on an ephemeral port.
pub struct TestRelay {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestRelay {
    pub async fn start(config: RelayConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let shutdown = Shutdown::new();
        let server = HttpServer::new(config, None).unwrap();
        let server_shutdown = shutdown.subscribe();
        tokio::spawn(async move {
            let _ = server.run(listener, server_shutdown).await;
        });

        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap();

        Self { addr, client, shutdown }
    }

    pub fn relay_url(&self) -> String {
        format!("http://{}{}", self.addr, RELAY_PATH)
    }

    /// GET the relay with `url` as the (encoded) target parameter.
    pub async fn relay(&self, target: &str) -> reqwest::Response {
        let url = reqwest::Url::parse_with_params(&self.relay_url(), &[("url", target)]).unwrap();
        self.client.get(url).send().await.expect("relay unreachable")
    }

    /// GET the relay with a raw query string.
    pub async fn relay_raw(&self, query: &str) -> reqwest::Response {
        let url = if query.is_empty() {
            self.relay_url()
        } else {
            format!("{}?{}", self.relay_url(), query)
        };
        self.client.get(url).send().await.expect("relay unreachable")
    }
}

impl Drop for TestRelay {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Bytes that look like a PNG, long enough to span several chunks.
pub fn png_bytes(len: usize) -> Vec<u8> {
    let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
    bytes.extend((0..len).map(|i| (i % 251) as u8));
    bytes
}
