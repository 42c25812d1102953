//! Shared utilities for integration testing.

use std::io::{Read, Write};
use std::net::SocketAddr;

use axum::Router;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use site_proxy::config::ProxyConfig;
use site_proxy::{HttpServer, Shutdown};
use tokio::net::TcpListener;

pub const SLUG: &str = "blog";
pub const ROOT_PAGE_ID: &str = "root-page";
pub const VERIFICATION_TOKEN: &str = "verify-123";
pub const PAGE_TITLE: &str = "Test Blog";
pub const PAGE_DESCRIPTION: &str = "A test description";

/// Serve `router` as a mock backend on an ephemeral port.
pub async fn start_mock_backend(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    addr
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// A running proxy; shut down on drop.
pub struct TestProxy {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestProxy {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Config pointing at a backend, with the test site values.
pub fn test_config(backend: SocketAddr) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.site.domain = format!("http://{}", backend);
    config.site.slug = SLUG.into();
    config.site.sitemap_id = ROOT_PAGE_ID.into();
    config.site.google_site_verification = VERIFICATION_TOKEN.into();
    config.site.page_title = PAGE_TITLE.into();
    config.site.page_description = PAGE_DESCRIPTION.into();
    config
}

/// Start the proxy in front of `backend`.
pub async fn start_proxy(backend: SocketAddr) -> TestProxy {
    let shutdown = Shutdown::new();
    let server = HttpServer::new(test_config(backend)).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestProxy { addr, shutdown }
}

/// Client that neither follows redirects nor decompresses.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

#[allow(dead_code)]
pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

#[allow(dead_code)]
pub fn gunzip(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    GzDecoder::new(data).read_to_end(&mut out).unwrap();
    out
}
