//! Backend subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request (method, path, query, headers, body)
//!     → target.rs (domain + path + query, image URL escaping)
//!     → client.rs (header copy, streamed body, redirects not followed)
//!     → backend response handed to the transformer
//! ```
//!
//! # Design Decisions
//! - One client per process, shared by the proxy path and the sitemap
//! - Redirect handling is an explicit client option
//! - No retries and no client-side timeout beyond transport defaults

pub mod client;
pub mod target;

pub use client::{BackendClient, RedirectPolicy};
pub use target::build_target_url;
