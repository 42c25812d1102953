//! Outbound client for the site backend.
//!
//! # Responsibilities
//! - Derive the upstream URL for an inbound request
//! - Copy inbound headers and stream the inbound body upstream
//! - Return the backend response untouched, including redirects

use axum::body::{Body, HttpBody};
use axum::http::Request;
use reqwest::redirect;

use crate::backend::target::build_target_url;
use crate::http::error::ProxyResult;
use crate::http::headers::upstream_request_headers;

/// Whether the outbound client follows 3xx responses itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectPolicy {
    /// Hand redirects back to the caller unchanged.
    PassThrough,
    /// Let the client chase redirects (reqwest default, up to 10 hops).
    Follow,
}

impl RedirectPolicy {
    fn to_reqwest(self) -> redirect::Policy {
        match self {
            RedirectPolicy::PassThrough => redirect::Policy::none(),
            RedirectPolicy::Follow => redirect::Policy::default(),
        }
    }
}

/// HTTP client bound to one backend domain.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    domain: String,
}

impl BackendClient {
    /// Create a client for `domain` with the given redirect policy.
    pub fn new(domain: impl Into<String>, redirects: RedirectPolicy) -> ProxyResult<Self> {
        let http = reqwest::Client::builder()
            .redirect(redirects.to_reqwest())
            .build()?;

        Ok(Self {
            http,
            domain: domain.into().trim_end_matches('/').to_string(),
        })
    }

    /// Backend domain without trailing slash.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Underlying HTTP client, for calls with fixed payloads.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Forward an inbound request to the backend and return its response.
    pub async fn forward(&self, request: Request<Body>) -> ProxyResult<reqwest::Response> {
        let (parts, body) = request.into_parts();

        let target = build_target_url(&self.domain, parts.uri.path(), parts.uri.query());
        tracing::debug!(method = %parts.method, target = %target, "Proxying request");

        let mut outbound = self
            .http
            .request(parts.method, target.as_str())
            .headers(upstream_request_headers(&parts.headers));

        // An empty inbound body stays empty rather than becoming a chunked stream
        if body.size_hint().exact() != Some(0) {
            outbound = outbound.body(reqwest::Body::wrap_stream(body.into_data_stream()));
        }

        let response = outbound.send().await?;

        tracing::debug!(
            target = %target,
            status = %response.status(),
            "Backend responded"
        );
        Ok(response)
    }
}
