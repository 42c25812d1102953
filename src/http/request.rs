//! Request identification and origin extraction.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) per inbound request
//! - Work out the public origin (`scheme://host`) the client used
//!
//! # Design Decisions
//! - Request ID lives in request extensions, so the headers forwarded
//!   upstream stay a faithful copy of what the client sent
//! - The ID is echoed on the response unless the backend already set one

use axum::body::Body;
use axum::http::{header, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Unique ID assigned to each inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Access to the request ID of a request.
pub trait RequestIdExt {
    fn request_id(&self) -> Option<RequestId>;
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> Option<RequestId> {
        self.extensions().get::<RequestId>().copied()
    }
}

/// Middleware assigning a [`RequestId`] to every request.
pub async fn assign_request_id(mut request: Request<Body>, next: Next) -> Response {
    let id = RequestId::new();
    request.extensions_mut().insert(id);

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
        response.headers_mut().entry(X_REQUEST_ID).or_insert(value);
    }
    response
}

/// URL scheme of the inbound connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    /// Scheme for a connection that was, or was not, TLS-terminated here.
    pub fn for_tls(tls: bool) -> Self {
        if tls { Scheme::Https } else { Scheme::Http }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

/// Public origin of a request: `scheme://host`.
pub fn base_url<B>(scheme: Scheme, request: &Request<B>) -> String {
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| request.uri().authority().map(|a| a.as_str()))
        .unwrap_or_default();

    format!("{}://{}", scheme.as_str(), host)
}
