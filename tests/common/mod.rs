//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use origin_status::config::{CheckConfig, ChecksConfig, ServiceConfig};
use origin_status::http::HttpServer;
use origin_status::lifecycle::Shutdown;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// What a mock origin sends back for one request.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub delay: Duration,
    pub location: Option<String>,
}

impl Reply {
    pub fn ok() -> Self {
        Self::status(200)
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            delay: Duration::ZERO,
            location: None,
        }
    }

    /// A redirect pointing at `target`.
    pub fn redirect(status: u16, target: &str) -> Self {
        Self {
            location: Some(target.to_string()),
            ..Self::status(status)
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A running mock origin.
pub struct MockOrigin {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl MockOrigin {
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Start a programmable mock origin. `f` receives the zero-based hit number.
pub async fn start_origin<F, Fut>(f: F) -> MockOrigin
where
    F: Fn(usize) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Reply> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let f = Arc::new(f);

    let counter = hits.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            let counter = counter.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 2048];
                let _ = socket.read(&mut buf).await;

                let n = counter.fetch_add(1, Ordering::SeqCst);
                let reply = f(n).await;
                tokio::time::sleep(reply.delay).await;

                let body = "origin";
                let location = reply
                    .location
                    .map(|target| format!("Location: {}\r\n", target))
                    .unwrap_or_default();
                let response = format!(
                    "HTTP/1.1 {} Mock\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                    reply.status,
                    location,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    MockOrigin { addr, hits }
}

/// Start a mock origin that always sends the same reply.
pub async fn start_fixed_origin(reply: Reply) -> MockOrigin {
    start_origin(move |_| {
        let reply = reply.clone();
        async move { reply }
    })
    .await
}

/// An address nothing is listening on.
pub async fn closed_origin() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/", addr)
}

/// Service config probing the given checks, with proxies disabled.
pub fn config_with_checks(checks: Vec<CheckConfig>) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.probe.use_system_proxy = false;
    config.probe.timeout_secs = 2;
    config.timeouts.request_secs = 10;
    config.checks = ChecksConfig(checks);
    config
}

/// A running service instance.
pub struct Service {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl Service {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get_json(&self, path: &str) -> serde_json::Value {
        let res = self.client.get(self.url(path)).send().await.expect("service unreachable");
        assert_eq!(res.status(), 200);
        res.json().await.expect("body is not JSON")
    }
}

impl Drop for Service {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_service(config: ServiceConfig) -> Service {
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.requested();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    Service {
        addr,
        client,
        shutdown,
    }
}
