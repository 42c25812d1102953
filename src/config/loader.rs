//! Configuration loading from disk and environment.

use std::path::Path;
use std::fs;
use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from an optional TOML file, overlay the process
/// environment, and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<ProxyConfig, ConfigError> {
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => ProxyConfig::default(),
    };

    let config = apply_env_overrides(config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment values onto a parsed config.
///
/// `lookup` abstracts the environment so callers can supply fixtures.
pub fn apply_env_overrides<F>(mut config: ProxyConfig, lookup: F) -> ProxyConfig
where
    F: Fn(&str) -> Option<String>,
{
    let overrides: [(&str, &mut String); 8] = [
        ("SITE_DOMAIN", &mut config.site.domain),
        ("SITE_SLUG", &mut config.site.slug),
        ("GOOGLE_SITE_VERIFICATION", &mut config.site.google_site_verification),
        ("PAGE_TITLE", &mut config.site.page_title),
        ("PAGE_DESCRIPTION", &mut config.site.page_description),
        ("SITEMAP_ID", &mut config.site.sitemap_id),
        ("BIND_ADDRESS", &mut config.listener.bind_address),
        ("LOG_LEVEL", &mut config.observability.log_level),
    ];

    for (key, slot) in overrides {
        if let Some(value) = lookup(key) {
            *slot = value;
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_env_overrides_replace_file_values() {
        let mut config = ProxyConfig::default();
        config.site.slug = "from-file".into();
        config.site.page_title = "File Title".into();

        let env: HashMap<&str, &str> = [
            ("SITE_SLUG", "from-env"),
            ("SITEMAP_ID", "root-page"),
        ]
        .into_iter()
        .collect();

        let config = apply_env_overrides(config, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.site.slug, "from-env");
        assert_eq!(config.site.sitemap_id, "root-page");
        // Untouched when the variable is absent
        assert_eq!(config.site.page_title, "File Title");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Some(Path::new("/nonexistent/site-proxy.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
