//! In-memory content repository for tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::{ContentClient, ContentError, PageFetcher, Query};
use crate::content::{BlockKind, RawContent, RawPage, RawPost, RawPostData, RichText, RichTextBlock};

/// Serves a fixed first page, cursor pages and documents by uid
#[derive(Default)]
pub struct FakeClient {
    first_page: RawPage,
    pages: HashMap<String, RawPage>,
    documents: HashMap<String, RawPost>,
    fail_next: AtomicBool,
    requests: Mutex<Vec<String>>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_first_page(mut self, page: RawPage) -> Self {
        self.first_page = page;
        self
    }

    pub fn with_page(mut self, cursor: &str, page: RawPage) -> Self {
        self.pages.insert(cursor.to_string(), page);
        self
    }

    pub fn with_document(mut self, post: RawPost) -> Self {
        let uid = post.uid.clone().unwrap_or_default();
        self.documents.insert(uid, post);
        self
    }

    /// Make the next request fail with HTTP 503
    pub fn fail_next_request(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Every request made so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, request: String) -> Result<(), ContentError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ContentError::Status {
                url: request,
                status: 503,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PageFetcher for FakeClient {
    async fn fetch_page(&self, cursor: &str) -> Result<RawPage, ContentError> {
        self.record(format!("page {}", cursor))?;
        self.pages
            .get(cursor)
            .cloned()
            .ok_or_else(|| ContentError::InvalidCursor(cursor.to_string()))
    }
}

#[async_trait]
impl ContentClient for FakeClient {
    async fn query(&self, query: &Query) -> Result<RawPage, ContentError> {
        self.record(format!("query {}", query.predicates_query_string()))?;
        Ok(self.first_page.clone())
    }

    async fn get_by_uid(&self, kind: &str, uid: &str) -> Result<RawPost, ContentError> {
        self.record(format!("get {} {}", kind, uid))?;
        self.documents
            .get(uid)
            .cloned()
            .ok_or_else(|| ContentError::NotFound {
                kind: kind.to_string(),
                uid: uid.to_string(),
            })
    }
}

/// A listing record as returned by the home query
pub fn raw_summary(uid: &str) -> RawPost {
    RawPost {
        uid: Some(uid.to_string()),
        first_publication_date: Some("2021-03-15T19:25:28+0000".to_string()),
        data: RawPostData {
            title: Some(format!("Title {}", uid)),
            subtitle: Some(format!("Subtitle {}", uid)),
            author: Some("Joseph Oliveira".to_string()),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// A full post whose content blocks have the given headings and body word counts
pub fn raw_detail(uid: &str, blocks: &[(&str, usize)]) -> RawPost {
    let mut post = raw_summary(uid);
    post.data.banner = Some(crate::content::RawImage {
        url: Some(format!("https://images.prismic.io/{}.png", uid)),
        alt: None,
    });
    post.data.content = blocks
        .iter()
        .map(|(heading, words)| RawContent {
            heading: Some(heading.to_string()),
            body: RichText(vec![RichTextBlock::text(
                BlockKind::Paragraph,
                &vec!["lorem"; *words].join(" "),
            )]),
        })
        .collect();
    post
}
