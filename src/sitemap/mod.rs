//! Sitemap subsystem.
//!
//! # Data Flow
//! ```text
//! GET /sitemap.xml
//!     → builder.rs resolve  (POST loadCachedPageChunkV2 → collection + view)
//!     → builder.rs query    (POST queryCollection → block IDs, max 50)
//!     → types.rs entries    (homepage 1.0, pages 0.8, daily, today)
//!     → render.rs           (urlset XML)
//! ```
//!
//! # Design Decisions
//! - Independent of the generic proxy pipeline; fixed payloads only
//! - Partial failure degrades to a homepage-only sitemap, still 200

pub mod builder;
pub mod render;
pub mod types;

pub use builder::SitemapBuilder;
pub use render::render_urlset;
pub use types::{ChangeFrequency, CollectionReference, SitemapEntry};
