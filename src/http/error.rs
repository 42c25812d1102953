//! Error types surfaced by the proxy pipeline.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors that can occur while proxying or building a response.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Network or transport failure reaching the backend.
    #[error("{0}")]
    Upstream(#[from] reqwest::Error),

    /// Backend returned a body that does not parse as the expected JSON.
    #[error("{0}")]
    MalformedJson(#[from] serde_json::Error),

    /// Backend JSON parsed but an expected key was absent.
    #[error("missing expected field: {0}")]
    MissingShape(&'static str),

    /// The collection query succeeded but listed no pages.
    #[error("no pages found in the collection view")]
    EmptyCollection,

    /// gzip encode/decode failure.
    #[error("{0}")]
    Compression(#[from] std::io::Error),

    /// Reading the inbound or backend body failed.
    #[error("{0}")]
    Body(#[from] axum::Error),

    /// Sitemap document could not be written.
    #[error("Failed to generate sitemap")]
    Render(#[from] std::fmt::Error),
}

/// Result type for proxy operations.
pub type ProxyResult<T> = Result<T, ProxyError>;

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_response_is_500_with_message() {
        let response = ProxyError::MissingShape("view_ids").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn test_json_error_message_is_exposed() {
        let err: ProxyError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert!(err.to_string().contains("key must be a string"));
    }
}
