//! Network layer.
//!
//! # Data Flow
//! ```text
//! listener.tls configured?
//!     no  → tokio TcpListener → axum::serve            (scheme http)
//!     yes → tls.rs (rustls)   → axum_server::bind_rustls (scheme https)
//! ```
//!
//! The scheme of the listener is what the root redirect, robots and
//! sitemap use when they build absolute URLs.

pub mod tls;
