//! Prismic REST API (v2) client

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{ContentClient, ContentError, PageFetcher, Predicate, Query};
use crate::config::SiteConfig;
use crate::content::{RawPage, RawPost};

/// API description returned by the endpoint root
#[derive(Debug, Deserialize)]
struct ApiInfo {
    #[serde(default)]
    refs: Vec<ApiRef>,
}

#[derive(Debug, Deserialize)]
struct ApiRef {
    #[serde(rename = "ref")]
    reference: String,
    #[serde(rename = "isMasterRef", default)]
    is_master_ref: bool,
}

/// HTTP client for a Prismic repository
#[derive(Debug, Clone)]
pub struct PrismicClient {
    http: reqwest::Client,
    endpoint: String,
    access_token: Option<String>,
}

impl PrismicClient {
    /// Create a client for `endpoint` (e.g. `https://repo.cdn.prismic.io/api/v2`)
    pub fn new(endpoint: &str, access_token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            access_token,
        }
    }

    /// Create a client from the site configuration
    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(&config.api_endpoint, config.access_token.clone())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Resolve the current master ref
    async fn master_ref(&self) -> Result<String, ContentError> {
        let mut url = parse_url(&self.endpoint)?;
        if let Some(token) = &self.access_token {
            url.query_pairs_mut().append_pair("access_token", token);
        }

        let info: ApiInfo = self.get_json(url).await?;
        info.refs
            .into_iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference)
            .ok_or(ContentError::MissingMasterRef)
    }

    /// Build the documents search URL for a query at `reference`
    fn search_url(&self, reference: &str, query: &Query) -> Result<Url, ContentError> {
        let mut url = parse_url(&format!("{}/documents/search", self.endpoint))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("ref", reference);
            pairs.append_pair("q", &query.predicates_query_string());
            if !query.fetch.is_empty() {
                pairs.append_pair("fetch", &query.fetch.join(","));
            }
            if let Some(page_size) = query.page_size {
                pairs.append_pair("pageSize", &page_size.to_string());
            }
            if let Some(token) = &self.access_token {
                pairs.append_pair("access_token", token);
            }
        }
        Ok(url)
    }

    /// Turn a `next_page` cursor into a request URL
    fn cursor_url(&self, cursor: &str) -> Result<Url, ContentError> {
        let mut url =
            Url::parse(cursor).map_err(|_| ContentError::InvalidCursor(cursor.to_string()))?;

        if let Some(token) = &self.access_token {
            let has_token = url.query_pairs().any(|(k, _)| k == "access_token");
            if !has_token {
                url.query_pairs_mut().append_pair("access_token", token);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ContentError> {
        let target = describe(&url);
        tracing::debug!("GET {}", target);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| ContentError::Network {
                url: target.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContentError::Status {
                url: target,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| ContentError::Network {
                url: target.clone(),
                source,
            })?;

        serde_json::from_str(&body).map_err(|e| ContentError::Decode {
            url: target,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl PageFetcher for PrismicClient {
    async fn fetch_page(&self, cursor: &str) -> Result<RawPage, ContentError> {
        let url = self.cursor_url(cursor)?;
        self.get_json(url).await
    }
}

#[async_trait]
impl ContentClient for PrismicClient {
    async fn query(&self, query: &Query) -> Result<RawPage, ContentError> {
        let reference = self.master_ref().await?;
        let url = self.search_url(&reference, query)?;
        self.get_json(url).await
    }

    async fn get_by_uid(&self, kind: &str, uid: &str) -> Result<RawPost, ContentError> {
        let query = Query {
            predicates: vec![Predicate::at(&format!("my.{}.uid", kind), uid)],
            fetch: Vec::new(),
            page_size: Some(1),
        };

        let page = self.query(&query).await?;
        page.results
            .into_iter()
            .next()
            .ok_or_else(|| ContentError::NotFound {
                kind: kind.to_string(),
                uid: uid.to_string(),
            })
    }
}

fn parse_url(s: &str) -> Result<Url, ContentError> {
    Url::parse(s).map_err(|e| ContentError::Decode {
        url: s.to_string(),
        message: format!("invalid endpoint: {}", e),
    })
}

/// Request target without the query string, which may carry the access token
fn describe(url: &Url) -> String {
    format!(
        "{}://{}{}",
        url.scheme(),
        url.host_str().unwrap_or_default(),
        url.path()
    )
}
