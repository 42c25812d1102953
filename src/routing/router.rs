//! Route lookup.
//!
//! # Responsibilities
//! - Classify an inbound path into one of the fixed routes
//! - Hand everything unmatched to the proxy pipeline
//!
//! # Design Decisions
//! - Exact match on the path with its leading slash stripped
//! - Method-agnostic: routing looks at the path only
//! - Deterministic: same input always matches same route

/// What to do with an inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    /// Bare root: redirect to the configured slug.
    Root,
    /// Generated sitemap.
    Sitemap,
    /// Fixed robots policy.
    Robots,
    /// Forward to the backend; carries the path without its leading slash.
    Proxy(&'a str),
}

impl<'a> Route<'a> {
    /// Classify a URI path.
    pub fn classify(path: &'a str) -> Self {
        let trimmed = path.strip_prefix('/').unwrap_or(path);
        match trimmed {
            "" => Route::Root,
            "sitemap.xml" => Route::Sitemap,
            "robots.txt" => Route::Robots,
            other => Route::Proxy(other),
        }
    }

    /// Label for logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            Route::Root => "root",
            Route::Sitemap => "sitemap",
            Route::Robots => "robots",
            Route::Proxy(_) => "proxy",
        }
    }
}
