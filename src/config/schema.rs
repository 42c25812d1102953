//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Synthetic browser identity sent on the sitemap backend queries.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Root configuration for the site proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// The fronted site: backend domain, slug and branding.
    pub site: SiteConfig,

    /// Sitemap backend query settings.
    pub sitemap: SitemapConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// The site being fronted.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Backend domain including scheme, without trailing slash
    /// (e.g., "https://example.notion.site").
    pub domain: String,

    /// Public slug the bare root redirects to.
    pub slug: String,

    /// Token for the `google-site-verification` meta tag.
    pub google_site_verification: String,

    /// Title re-asserted on every page.
    pub page_title: String,

    /// Description re-asserted on every page.
    pub page_description: String,

    /// Root page whose collection is enumerated for the sitemap.
    pub sitemap_id: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            domain: "https://www.notion.so".to_string(),
            slug: String::new(),
            google_site_verification: String::new(),
            page_title: String::new(),
            page_description: String::new(),
            sitemap_id: String::new(),
        }
    }
}

impl SiteConfig {
    /// Backend domain with any trailing slash removed.
    pub fn backend_domain(&self) -> &str {
        self.domain.trim_end_matches('/')
    }
}

/// Sitemap backend query settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SitemapConfig {
    /// Page limit on the collection query (no pagination beyond it).
    pub page_limit: u32,

    /// Chunk limit on the root page resolve call.
    pub chunk_limit: u32,

    /// Time zone reported to the collection query.
    pub user_time_zone: String,

    /// User-Agent sent on both sitemap calls.
    pub user_agent: String,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            page_limit: 50,
            chunk_limit: 30,
            user_time_zone: "Asia/Shanghai".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Pretty for development, JSON for log aggregation.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
