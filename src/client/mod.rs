//! Content repository client
//!
//! The rest of the crate only depends on the [`ContentClient`] and
//! [`PageFetcher`] traits; [`PrismicClient`] is the HTTP implementation.

mod error;
mod prismic;
#[cfg(test)]
pub(crate) mod testing;

pub use error::ContentError;
pub use prismic::PrismicClient;

use async_trait::async_trait;

use crate::content::{RawPage, RawPost};

/// Document type holding blog posts
pub const POSTS_DOCUMENT_TYPE: &str = "posts";

/// A query predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `[at(<path>, "<value>")]`
    At { path: String, value: String },
}

impl Predicate {
    pub fn at(path: &str, value: &str) -> Self {
        Predicate::At {
            path: path.to_string(),
            value: value.to_string(),
        }
    }

    /// `document.type = <kind>`
    pub fn document_type(kind: &str) -> Self {
        Self::at("document.type", kind)
    }

    /// Query-string form, e.g. `[at(document.type,"posts")]`
    pub fn to_query_string(&self) -> String {
        match self {
            Predicate::At { path, value } => {
                let value = value.replace('\\', "\\\\").replace('"', "\\\"");
                format!("[at({},\"{}\")]", path, value)
            }
        }
    }
}

/// A document query with its field projection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub predicates: Vec<Predicate>,
    /// Fields to return (`<type>.<field>`); empty means all fields
    pub fetch: Vec<String>,
    pub page_size: Option<u32>,
}

impl Query {
    /// The home listing query: every post, projected onto title, subtitle and author
    pub fn posts_listing(page_size: u32) -> Self {
        Self {
            predicates: vec![Predicate::document_type(POSTS_DOCUMENT_TYPE)],
            fetch: ["title", "subtitle", "author"]
                .iter()
                .map(|f| format!("{}.{}", POSTS_DOCUMENT_TYPE, f))
                .collect(),
            page_size: Some(page_size),
        }
    }

    /// `q` parameter: all predicates wrapped in one list
    pub fn predicates_query_string(&self) -> String {
        let inner: String = self
            .predicates
            .iter()
            .map(Predicate::to_query_string)
            .collect();
        format!("[{}]", inner)
    }
}

/// Fetches a page of results by its cursor
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, cursor: &str) -> Result<RawPage, ContentError>;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for &T {
    async fn fetch_page(&self, cursor: &str) -> Result<RawPage, ContentError> {
        (**self).fetch_page(cursor).await
    }
}

/// Read access to the content repository
#[async_trait]
pub trait ContentClient: PageFetcher {
    /// Run a query and return its first page
    async fn query(&self, query: &Query) -> Result<RawPage, ContentError>;

    /// Fetch a single document of type `kind` by uid
    async fn get_by_uid(&self, kind: &str, uid: &str) -> Result<RawPost, ContentError>;
}
