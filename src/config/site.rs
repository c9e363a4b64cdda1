//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable overriding `api_endpoint`
pub const API_ENDPOINT_ENV: &str = "PRISMIC_API_ENDPOINT";

/// Environment variable overriding `access_token`
pub const ACCESS_TOKEN_ENV: &str = "PRISMIC_ACCESS_TOKEN";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,

    // Content repository
    pub api_endpoint: String,
    pub access_token: Option<String>,
    pub page_size: u32,
    pub dedupe_posts: bool,

    // Date format (Moment.js style)
    pub date_format: String,

    // Directory
    pub public_dir: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "spacetraveling".to_string(),
            description: String::new(),

            api_endpoint: "https://spacetraveling.cdn.prismic.io/api/v2".to_string(),
            access_token: None,
            page_size: 1,
            dedupe_posts: false,

            date_format: "DD MMM YYYY".to_string(),

            public_dir: "public".to_string(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Apply `PRISMIC_*` environment overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var(API_ENDPOINT_ENV).ok(),
            std::env::var(ACCESS_TOKEN_ENV).ok(),
        );
    }

    fn apply_overrides(&mut self, endpoint: Option<String>, token: Option<String>) {
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            tracing::debug!("Using API endpoint from {}", API_ENDPOINT_ENV);
            self.api_endpoint = endpoint;
        }
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            tracing::debug!("Using access token from {}", ACCESS_TOKEN_ENV);
            self.access_token = Some(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.page_size, 1);
        assert_eq!(config.date_format, "DD MMM YYYY");
        assert!(!config.dedupe_posts);
        assert!(config.access_token.is_none());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
api_endpoint: https://myblog.cdn.prismic.io/api/v2
page_size: 20
dedupe_posts: true
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.api_endpoint, "https://myblog.cdn.prismic.io/api/v2");
        assert_eq!(config.page_size, 20);
        assert!(config.dedupe_posts);
        assert_eq!(config.public_dir, "public");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "access_token: secret\n").unwrap();

        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.access_token.as_deref(), Some("secret"));
        assert_eq!(config.title, "spacetraveling");
    }

    #[test]
    fn test_overrides_ignore_blank_values() {
        let mut config = SiteConfig::default();
        config.apply_overrides(Some("  ".to_string()), Some("token".to_string()));
        assert_eq!(config.api_endpoint, SiteConfig::default().api_endpoint);
        assert_eq!(config.access_token.as_deref(), Some("token"));
    }
}
