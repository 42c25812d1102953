//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create Axum Router with the dispatch handler
//! - Wire up middleware (tracing, request ID)
//! - Serve on a plain TCP listener or a TLS listener
//! - Dispatch requests: root redirect, robots, sitemap, proxy
//! - Observability (metrics, request IDs)

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::backend::{BackendClient, RedirectPolicy};
use crate::config::ProxyConfig;
use crate::http::error::ProxyResult;
use crate::http::request::{assign_request_id, base_url, RequestIdExt, Scheme};
use crate::observability::metrics;
use crate::routing::Route;
use crate::sitemap::{render_urlset, SitemapBuilder};
use crate::transform::{HtmlInjector, ResponseTransformer};

/// How long in-flight TLS connections may drain after shutdown.
const TLS_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub backend: BackendClient,
    pub transformer: Arc<ResponseTransformer>,
    pub sitemap: Arc<SitemapBuilder>,
    pub slug: Arc<str>,
    /// Scheme of the listener this router is served on.
    pub scheme: Scheme,
}

/// HTTP server for the site proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> ProxyResult<Self> {
        let backend =
            BackendClient::new(config.site.backend_domain(), RedirectPolicy::PassThrough)?;
        let transformer = Arc::new(ResponseTransformer::new(HtmlInjector::from_site(&config.site)));
        let sitemap = Arc::new(SitemapBuilder::new(
            backend.clone(),
            &config.site,
            config.sitemap.clone(),
        ));

        let state = AppState {
            backend,
            transformer,
            sitemap,
            slug: Arc::from(config.site.slug.as_str()),
            scheme: Scheme::for_tls(config.listener.tls.is_some()),
        };

        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", any(dispatch))
            .route("/{*path}", any(dispatch))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(middleware::from_fn(assign_request_id)),
            )
    }

    /// Run the server on a plain TCP listener until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server behind TLS until `shutdown` fires.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(address = %addr, "HTTPS server starting");

        let handle = axum_server::Handle::new();
        let drain = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            tracing::info!("Shutdown signal received");
            drain.graceful_shutdown(Some(TLS_DRAIN_TIMEOUT));
        });

        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Entry point for every request.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let request_id = request
        .request_id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        uri = %request.uri(),
        "Request received"
    );

    let route = Route::classify(&path);
    let response = match route {
        Route::Root => redirect_to_slug(&state, &request),
        Route::Robots => robots(&state, &request),
        Route::Sitemap => {
            let base = base_url(state.scheme, &request);
            sitemap(&state, &base).await.into_response()
        }
        Route::Proxy(path) => proxy(&state, path, request).await.into_response(),
    };

    metrics::record_request(&method, response.status().as_u16(), route.name(), start_time);
    response
}

/// 301 from the bare root to the configured homepage slug.
fn redirect_to_slug(state: &AppState, request: &Request<Body>) -> Response {
    let location = format!("{}/{}", base_url(state.scheme, request), state.slug);
    tracing::debug!(location = %location, "Redirecting to homepage");
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
}

/// Body of `/robots.txt` for a site origin.
pub fn robots_body(base_url: &str) -> String {
    format!("User-agent: *\nAllow: /\n\nSitemap: {}/sitemap.xml", base_url)
}

fn robots(state: &AppState, request: &Request<Body>) -> Response {
    let body = robots_body(&base_url(state.scheme, request));
    ([(header::CONTENT_TYPE, "text/plain")], body).into_response()
}

async fn sitemap(state: &AppState, base: &str) -> ProxyResult<Response> {
    let today = chrono::Local::now().date_naive();

    let entries = state.sitemap.build(base, today).await;
    metrics::record_sitemap_pages(entries.len().saturating_sub(1));

    let xml = render_urlset(&entries)?;
    Ok(([(header::CONTENT_TYPE, "application/xml")], xml).into_response())
}

async fn proxy(state: &AppState, path: &str, request: Request<Body>) -> ProxyResult<Response> {
    let response = state.backend.forward(request).await?;
    state.transformer.transform(path, response).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_robots_body() {
        assert_eq!(
            robots_body("https://example.com"),
            "User-agent: *\nAllow: /\n\nSitemap: https://example.com/sitemap.xml"
        );
    }

    #[test]
    fn test_server_builds_from_default_config() {
        let mut config = ProxyConfig::default();
        config.site.slug = "blog".into();
        let server = HttpServer::new(config).unwrap();
        assert_eq!(server.config().site.slug, "blog");
    }
}
