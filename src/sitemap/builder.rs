//! Page discovery for the sitemap.
//!
//! # Responsibilities
//! - Resolve the configured root page to its collection and view
//! - Query the first page of that collection for block IDs
//! - Assemble entries, degrading to the homepage alone on any failure
//!
//! # Design Decisions
//! - Two sequential backend calls, no retries, no pagination
//! - Backend JSON is walked step by step; a missing key is an error value,
//!   never a panic
//! - Failures are logged, not surfaced: a homepage-only sitemap is valid

use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::backend::BackendClient;
use crate::config::{SiteConfig, SitemapConfig};
use crate::http::error::{ProxyError, ProxyResult};
use crate::sitemap::types::{CollectionReference, SitemapEntry};

/// Backend endpoint that loads a page and its record map.
pub const LOAD_PAGE_CHUNK_PATH: &str = "/api/v3/loadCachedPageChunkV2";

/// Backend endpoint that runs a collection query.
pub const QUERY_COLLECTION_PATH: &str = "/api/v3/queryCollection";

/// Enumerates site pages through the backend's collection API.
#[derive(Debug, Clone)]
pub struct SitemapBuilder {
    client: BackendClient,
    root_page_id: String,
    slug: String,
    settings: SitemapConfig,
}

impl SitemapBuilder {
    pub fn new(client: BackendClient, site: &SiteConfig, settings: SitemapConfig) -> Self {
        Self {
            client,
            root_page_id: site.sitemap_id.clone(),
            slug: site.slug.clone(),
            settings,
        }
    }

    /// Build all entries for a site served at `base_url` (`scheme://host`).
    ///
    /// Always contains the homepage entry first.
    pub async fn build(&self, base_url: &str, today: NaiveDate) -> Vec<SitemapEntry> {
        let mut entries = vec![SitemapEntry::root(format!("{}/{}", base_url, self.slug), today)];

        match self.discover_pages().await {
            Ok(page_ids) => {
                tracing::debug!(pages = page_ids.len(), "Loaded sitemap pages");
                entries.extend(
                    page_ids
                        .iter()
                        .map(|id| SitemapEntry::page(page_url(base_url, id), today)),
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load database pages");
            }
        }

        entries
    }

    /// Resolve the root page, then list the pages of its collection.
    pub async fn discover_pages(&self) -> ProxyResult<Vec<String>> {
        let reference = self.resolve().await?;
        tracing::debug!(
            collection_id = %reference.collection_id,
            view_id = %reference.view_id,
            "Resolved sitemap collection"
        );
        self.query(&reference).await
    }

    /// Look up the collection and view behind the root page.
    pub async fn resolve(&self) -> ProxyResult<CollectionReference> {
        let payload = json!({
            "page": { "id": self.root_page_id },
            "limit": self.settings.chunk_limit,
            "cursor": { "stack": [] },
            "verticalColumns": false,
        });

        let request = self
            .client
            .http()
            .post(format!("{}{}", self.client.domain(), LOAD_PAGE_CHUNK_PATH))
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9");

        let result = self.post_json(request, &payload).await?;
        parse_collection_reference(&result, &self.root_page_id)
    }

    /// Fetch the page IDs of a collection view, up to the configured limit.
    pub async fn query(&self, reference: &CollectionReference) -> ProxyResult<Vec<String>> {
        let payload = json!({
            "collection": { "id": reference.collection_id },
            "collectionView": { "id": reference.view_id },
            "loader": {
                "type": "reducer",
                "reducers": {
                    "collection_group_results": {
                        "type": "results",
                        "limit": self.settings.page_limit,
                    },
                },
                "sort": [],
                "searchQuery": "",
                "userTimeZone": self.settings.user_time_zone,
            },
        });

        let request = self
            .client
            .http()
            .post(format!("{}{}", self.client.domain(), QUERY_COLLECTION_PATH));

        let result = self.post_json(request, &payload).await?;
        parse_page_ids(&result, self.settings.page_limit as usize)
    }

    async fn post_json(
        &self,
        request: reqwest::RequestBuilder,
        payload: &Value,
    ) -> ProxyResult<Value> {
        let response = request
            .header(reqwest::header::ACCEPT, "*/*")
            .header(reqwest::header::USER_AGENT, self.settings.user_agent.as_str())
            .json(payload)
            .send()
            .await?;

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Absolute URL of a page: hyphens are dropped from the block ID.
pub fn page_url(base_url: &str, page_id: &str) -> String {
    format!("{}/{}", base_url, page_id.replace('-', ""))
}

/// Extract `recordMap.block[<root>].value.{view_ids[0], collection_id}`.
pub fn parse_collection_reference(
    result: &Value,
    root_page_id: &str,
) -> ProxyResult<CollectionReference> {
    let value = result
        .get("recordMap")
        .and_then(|m| m.get("block"))
        .and_then(|b| b.get(root_page_id))
        .and_then(|b| b.get("value"))
        .ok_or(ProxyError::MissingShape("recordMap.block[root].value"))?;

    let view_id = value
        .get("view_ids")
        .and_then(Value::as_array)
        .and_then(|ids| ids.first())
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .ok_or(ProxyError::MissingShape("view_ids"))?;

    let collection_id = value
        .get("collection_id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .ok_or(ProxyError::MissingShape("collection_id"))?;

    Ok(CollectionReference {
        collection_id: collection_id.to_string(),
        view_id: view_id.to_string(),
    })
}

/// Extract at most `limit` IDs from `result.reducerResults.collection_group_results.blockIds`.
///
/// Non-string entries are skipped; an empty list is an error.
pub fn parse_page_ids(result: &Value, limit: usize) -> ProxyResult<Vec<String>> {
    let block_ids = result
        .get("result")
        .and_then(|r| r.get("reducerResults"))
        .and_then(|r| r.get("collection_group_results"))
        .and_then(|r| r.get("blockIds"))
        .and_then(Value::as_array)
        .ok_or(ProxyError::MissingShape(
            "result.reducerResults.collection_group_results.blockIds",
        ))?;

    let ids: Vec<String> = block_ids
        .iter()
        .filter_map(Value::as_str)
        .take(limit)
        .map(str::to_string)
        .collect();

    if ids.is_empty() {
        return Err(ProxyError::EmptyCollection);
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_collection_reference() {
        let result = json!({
            "recordMap": {
                "block": {
                    "root-1": {
                        "value": {
                            "view_ids": ["v1", "v2"],
                            "collection_id": "c1",
                        }
                    }
                }
            }
        });

        let reference = parse_collection_reference(&result, "root-1").unwrap();
        assert_eq!(
            reference,
            CollectionReference { collection_id: "c1".into(), view_id: "v1".into() }
        );
    }

    #[test]
    fn test_missing_view_ids() {
        let result = json!({
            "recordMap": { "block": { "root-1": { "value": { "collection_id": "c1" } } } }
        });
        let err = parse_collection_reference(&result, "root-1").unwrap_err();
        assert!(matches!(err, ProxyError::MissingShape("view_ids")));
    }

    #[test]
    fn test_wrong_root_or_shape() {
        let result = json!({
            "recordMap": {
                "block": { "other": { "value": { "view_ids": ["v1"], "collection_id": "c1" } } }
            }
        });
        assert!(parse_collection_reference(&result, "root-1").is_err());

        let result = json!({
            "recordMap": {
                "block": { "root-1": { "value": { "view_ids": "v1", "collection_id": 7 } } }
            }
        });
        assert!(parse_collection_reference(&result, "root-1").is_err());

        assert!(parse_collection_reference(&json!([]), "root-1").is_err());
    }

    #[test]
    fn test_parse_page_ids_skips_non_strings() {
        let result = json!({
            "result": {
                "reducerResults": {
                    "collection_group_results": { "blockIds": ["a-b", 42, "c"] }
                }
            }
        });
        assert_eq!(parse_page_ids(&result, 50).unwrap(), vec!["a-b", "c"]);
    }

    #[test]
    fn test_parse_page_ids_caps_at_limit() {
        let ids: Vec<String> = (0..60).map(|i| format!("page-{i}")).collect();
        let result = json!({
            "result": { "reducerResults": { "collection_group_results": { "blockIds": ids } } }
        });

        let parsed = parse_page_ids(&result, 50).unwrap();
        assert_eq!(parsed.len(), 50);
        assert_eq!(parsed.first().map(String::as_str), Some("page-0"));
        assert_eq!(parsed.last().map(String::as_str), Some("page-49"));
    }

    #[test]
    fn test_parse_page_ids_empty_and_missing() {
        let empty = json!({
            "result": { "reducerResults": { "collection_group_results": { "blockIds": [] } } }
        });
        assert!(matches!(parse_page_ids(&empty, 50), Err(ProxyError::EmptyCollection)));
        assert!(matches!(parse_page_ids(&json!({}), 50), Err(ProxyError::MissingShape(_))));
    }

    #[test]
    fn test_page_url_strips_hyphens() {
        assert_eq!(
            page_url("https://example.com", "11112222-3333-4444-5555-666677778888"),
            "https://example.com/11112222333344445555666677778888"
        );
    }
}
