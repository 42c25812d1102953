//! Upstream target URL construction.
//!
//! The target is the backend domain with the inbound path and query appended
//! verbatim. Image-proxy paths carry a full URL as their tail
//! (`/image/https://...`); the backend only accepts that tail when it is
//! escaped into a single opaque component.

use url::form_urlencoded;

/// Path segment that introduces an embedded image URL.
const IMAGE_SEGMENT: &str = "/image/";

/// Scheme that marks the start of the embedded URL.
const EMBEDDED_SCHEME: &str = "https://";

/// Build the upstream URL for an inbound path and optional raw query.
pub fn build_target_url(backend_domain: &str, path: &str, query: Option<&str>) -> String {
    let mut target = String::with_capacity(backend_domain.len() + path.len() + 1);
    target.push_str(backend_domain);
    target.push_str(path);

    if let Some(query) = query.filter(|q| !q.is_empty()) {
        target.push('?');
        target.push_str(query);
    }

    escape_embedded_image_url(backend_domain, target)
}

/// Percent-encode the embedded URL of an image-proxy target.
///
/// Targets without the `<domain>/image/https://` marker are returned as-is.
fn escape_embedded_image_url(backend_domain: &str, target: String) -> String {
    let marker = format!("{}{}", backend_domain, IMAGE_SEGMENT);

    let Some(start) = target.find(&marker) else {
        return target;
    };
    let tail_start = start + marker.len();
    let tail = &target[tail_start..];
    if !tail.starts_with(EMBEDDED_SCHEME) {
        return target;
    }

    let escaped: String = form_urlencoded::byte_serialize(tail.as_bytes()).collect();
    format!("{}{}", &target[..tail_start], escaped)
}
