//! Response transformation subsystem.
//!
//! # Data Flow
//! ```text
//! Backend response (status, headers, body)
//!     → Branch::select (path, Content-Type)
//!     ├─ StripInterstitial → buffer → decoder.rs → json.rs → re-encode
//!     ├─ InjectHtml        → buffer → decoder.rs → html.rs → re-encode
//!     └─ PassThrough       → stream body unmodified
//! ```
//!
//! # Design Decisions
//! - Exactly one branch per response; streaming and buffering never mix
//! - Rewritten bodies drop `Content-Length` (the server recomputes it) and
//!   restore the backend's gzip coding
//! - Bodies that claim gzip but fail to inflate are forwarded as received

pub mod decoder;
pub mod html;
pub mod json;

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;
use futures_util::TryStreamExt;

use crate::http::error::ProxyResult;
use crate::http::headers::copy_response_headers;
use crate::observability::metrics;
use decoder::{ContentCoding, Decoded};

pub use html::HtmlInjector;

/// Backend endpoint whose JSON carries the interstitial flag.
pub const PUBLIC_PAGE_DATA_PATH: &str = "api/v3/getPublicPageData";

/// The transformation applied to one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    StripInterstitial,
    InjectHtml,
    PassThrough,
}

impl Branch {
    /// Pick the branch for a proxied path (no leading slash) and backend headers.
    pub fn select(path: &str, headers: &HeaderMap) -> Self {
        if path == PUBLIC_PAGE_DATA_PATH {
            return Branch::StripInterstitial;
        }

        let is_html = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("text/html"))
            .unwrap_or(false);

        if is_html {
            Branch::InjectHtml
        } else {
            Branch::PassThrough
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::StripInterstitial => "strip_interstitial",
            Branch::InjectHtml => "inject_html",
            Branch::PassThrough => "pass_through",
        }
    }
}

/// Turns backend responses into client responses.
#[derive(Debug, Clone)]
pub struct ResponseTransformer {
    injector: HtmlInjector,
}

impl ResponseTransformer {
    pub fn new(injector: HtmlInjector) -> Self {
        Self { injector }
    }

    /// Transform a backend response for the given proxied path.
    pub async fn transform(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> ProxyResult<Response> {
        let branch = Branch::select(path, response.headers());
        tracing::debug!(path = %path, branch = branch.as_str(), "Transforming response");
        metrics::record_transform(branch.as_str());

        match branch {
            Branch::PassThrough => Ok(pass_through(response)),
            Branch::StripInterstitial => {
                let mut out = rewrite(response, |body| {
                    Ok(json::strip_field(body, json::INTERSTITIAL_FIELD)?)
                })
                .await?;
                out.headers_mut().insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                );
                Ok(out)
            }
            Branch::InjectHtml => {
                rewrite(response, |body| Ok(self.injector.inject(body).into_owned())).await
            }
        }
    }
}

/// Stream the backend body through untouched.
fn pass_through(response: reqwest::Response) -> Response {
    let status = response.status();
    let headers = response.headers().clone();

    let stream = response.bytes_stream().inspect_err(|e| {
        tracing::error!(error = %e, "Backend body stream failed");
    });

    build_response(status, &headers, Body::from_stream(stream))
}

/// Buffer, decode, rewrite and re-encode a backend body.
async fn rewrite<F>(response: reqwest::Response, f: F) -> ProxyResult<Response>
where
    F: FnOnce(&[u8]) -> ProxyResult<Vec<u8>>,
{
    let status = response.status();
    let headers = response.headers().clone();
    let body: Bytes = response.bytes().await?;

    let (plain, coding) = match decoder::decode(ContentCoding::from_headers(&headers), body) {
        Decoded::Plain { bytes, coding } => (bytes, coding),
        Decoded::Opaque(original) => {
            return Ok(build_response(status, &headers, Body::from(original)));
        }
    };

    let rewritten = f(&plain)?;
    let encoded = decoder::encode(coding, rewritten)?;

    let mut out = build_response(status, &headers, Body::from(encoded));
    let out_headers = out.headers_mut();
    out_headers.remove(header::CONTENT_LENGTH);
    if coding == ContentCoding::Gzip {
        out_headers.insert(header::CONTENT_ENCODING, HeaderValue::from_static("gzip"));
    }
    Ok(out)
}

fn build_response(status: StatusCode, headers: &HeaderMap, body: Body) -> Response {
    let mut out = Response::new(body);
    *out.status_mut() = status;
    copy_response_headers(headers, out.headers_mut());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_type(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn test_page_data_path_wins_over_content_type() {
        let headers = headers_with_type("text/html; charset=utf-8");
        assert_eq!(
            Branch::select("api/v3/getPublicPageData", &headers),
            Branch::StripInterstitial
        );
    }

    #[test]
    fn test_html_content_type() {
        assert_eq!(
            Branch::select("blog", &headers_with_type("text/html; charset=utf-8")),
            Branch::InjectHtml
        );
    }

    #[test]
    fn test_everything_else_passes_through() {
        assert_eq!(
            Branch::select(
                "api/v3/getPublicPageData/extra",
                &headers_with_type("application/json"),
            ),
            Branch::PassThrough
        );
        assert_eq!(
            Branch::select("logo.png", &headers_with_type("image/png")),
            Branch::PassThrough
        );
        assert_eq!(Branch::select("blog", &HeaderMap::new()), Branch::PassThrough);
    }
}
