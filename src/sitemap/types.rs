//! Sitemap value types.

use chrono::NaiveDate;

/// How often a page is expected to change.
///
/// Every entry is regenerated on request, so daily is the only value used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFrequency {
    Daily,
}

impl ChangeFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Daily => "daily",
        }
    }
}

/// One `<url>` element of a sitemap.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub location: String,
    pub last_modified: NaiveDate,
    pub change_frequency: ChangeFrequency,
    /// Relative priority, 0.0 to 1.0.
    pub priority: f32,
}

impl SitemapEntry {
    /// Priority of the homepage entry.
    pub const ROOT_PRIORITY: f32 = 1.0;
    /// Priority of every discovered page.
    pub const PAGE_PRIORITY: f32 = 0.8;

    /// The homepage entry.
    pub fn root(location: String, today: NaiveDate) -> Self {
        Self {
            location,
            last_modified: today,
            change_frequency: ChangeFrequency::Daily,
            priority: Self::ROOT_PRIORITY,
        }
    }

    /// An entry for a page discovered in the collection.
    pub fn page(location: String, today: NaiveDate) -> Self {
        Self {
            location,
            last_modified: today,
            change_frequency: ChangeFrequency::Daily,
            priority: Self::PAGE_PRIORITY,
        }
    }
}

/// Collection and view resolved from the root page.
///
/// Lives only for the duration of one sitemap build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionReference {
    pub collection_id: String,
    pub view_id: String,
}
