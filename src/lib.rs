//! spacetraveling: a blog rendered from a Prismic content repository
//!
//! The listing grows page by page through [`listing::ListingController`];
//! single posts are assembled by [`content::DetailAssembler`], which turns
//! rich text bodies into HTML and estimates the reading time.

pub mod client;
pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod listing;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::Path;

use client::{ContentClient, ContentError, PrismicClient, Query};
use listing::ListingController;

/// The blog application
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
}

impl Blog {
    /// Create a new blog from a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };
        config.apply_env_overrides();

        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            public_dir,
        })
    }

    /// HTTP client for the configured repository
    pub fn client(&self) -> PrismicClient {
        PrismicClient::from_config(&self.config)
    }

    /// Query the first listing page and start a listing from it
    pub async fn listing<'c, C>(
        &self,
        client: &'c C,
    ) -> Result<ListingController<&'c C>, ContentError>
    where
        C: ContentClient + ?Sized,
    {
        let first_page = client
            .query(&Query::posts_listing(self.config.page_size))
            .await?;
        tracing::debug!(
            "First listing page has {} posts",
            first_page.results.len()
        );

        Ok(ListingController::initialize(client, first_page)
            .with_dedupe_by_uid(self.config.dedupe_posts))
    }

    /// Generate the static site
    pub async fn generate(&self) -> Result<generator::GenerateReport> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
