//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware, dispatch)
//!     → request.rs (request ID, public origin)
//!     → [routing decides: redirect | robots | sitemap | proxy]
//!     → headers.rs (header copy between hops)
//!     → Send to client
//!
//! Any failure → error.rs (500, plain-text message)
//! ```

pub mod error;
pub mod headers;
pub mod request;
pub mod server;

pub use error::{ProxyError, ProxyResult};
pub use request::{RequestId, RequestIdExt, Scheme, X_REQUEST_ID};
pub use server::HttpServer;
