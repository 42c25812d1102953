//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → router.rs (exact match on the trimmed path)
//!     → Root | Sitemap | Robots | Proxy(path)
//! ```
//!
//! # Design Decisions
//! - Routes are fixed at compile time; there is no route table to load
//! - No regex in hot path
//! - First match wins

pub mod router;

pub use router::Route;
