//! Header copying between hops.
//!
//! # Responsibilities
//! - Copy end-to-end headers verbatim (multi-valued, order preserved)
//! - Strip hop-by-hop headers, which belong to a single connection
//!
//! # Design Decisions
//! - `Host` is derived from the target URL by the client, never copied
//! - Size and encoding headers are left to the caller, which knows
//!   whether the body was rewritten

use axum::http::header::{self, HeaderMap, HeaderName};

/// Connection-scoped headers (RFC 9110 §7.6.1).
const HOP_BY_HOP: [HeaderName; 6] = [
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Returns true if the header must not travel past the current hop.
pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(name) || name == "keep-alive" || name == "proxy-connection"
}

/// Headers to send upstream for an inbound request.
pub fn upstream_request_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(inbound.len());
    for (name, value) in inbound {
        if name == header::HOST || is_hop_by_hop(name) {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers
}

/// Copy backend response headers onto an outbound response.
pub fn copy_response_headers(backend: &HeaderMap, outbound: &mut HeaderMap) {
    for (name, value) in backend {
        if is_hop_by_hop(name) {
            continue;
        }
        outbound.append(name.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_multi_valued_headers_keep_order() {
        let mut inbound = HeaderMap::new();
        inbound.append(header::COOKIE, HeaderValue::from_static("a=1"));
        inbound.append(header::COOKIE, HeaderValue::from_static("b=2"));
        inbound.insert(header::ACCEPT, HeaderValue::from_static("*/*"));

        let upstream = upstream_request_headers(&inbound);
        let cookies: Vec<_> = upstream.get_all(header::COOKIE).iter().collect();
        assert_eq!(cookies, vec!["a=1", "b=2"]);
        assert_eq!(upstream.get(header::ACCEPT).unwrap(), "*/*");
    }

    #[test]
    fn test_host_and_hop_by_hop_are_dropped() {
        let mut inbound = HeaderMap::new();
        inbound.insert(header::HOST, HeaderValue::from_static("proxy.example.com"));
        inbound.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        inbound.insert("keep-alive", HeaderValue::from_static("timeout=5"));
        inbound.insert(header::USER_AGENT, HeaderValue::from_static("test"));

        let upstream = upstream_request_headers(&inbound);
        assert_eq!(upstream.len(), 1);
        assert!(upstream.contains_key(header::USER_AGENT));
    }

    #[test]
    fn test_response_copy_appends() {
        let mut backend = HeaderMap::new();
        backend.append(header::SET_COOKIE, HeaderValue::from_static("a=1"));
        backend.append(header::SET_COOKIE, HeaderValue::from_static("b=2"));
        backend.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));

        let mut outbound = HeaderMap::new();
        copy_response_headers(&backend, &mut outbound);
        assert_eq!(outbound.get_all(header::SET_COOKIE).iter().count(), 2);
        assert!(!outbound.contains_key(header::TRANSFER_ENCODING));
    }
}
