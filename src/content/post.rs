//! Post models built from raw documents

use chrono::{DateTime, FixedOffset};

use super::{RawPost, ReadingTime, RichText, RichTextRenderer};
use crate::helpers::parse_publication_date;

/// Minimal post data shown in the listing
#[derive(Debug, Clone, PartialEq)]
pub struct PostSummary {
    pub uid: Option<String>,
    pub publication_date: Option<DateTime<FixedOffset>>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub author: Option<String>,
}

impl PostSummary {
    /// Normalize a raw document into a summary
    ///
    /// Only uid, first publication date, title, subtitle and author are kept.
    /// A missing field becomes `None`.
    pub fn from_raw(raw: RawPost) -> Self {
        Self {
            uid: raw.uid,
            publication_date: raw
                .first_publication_date
                .as_deref()
                .and_then(parse_publication_date),
            title: raw.data.title,
            subtitle: raw.data.subtitle,
            author: raw.data.author,
        }
    }
}

/// A section of a post: heading plus rich text body
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlock {
    pub heading: Option<String>,
    /// Body as stored upstream, transformed only when rendered
    pub body: RichText,
}

/// A content block with its body rendered to HTML
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RenderedBlock {
    pub heading: String,
    pub body: String,
}

/// Everything needed to render a post page
#[derive(Debug, Clone, PartialEq)]
pub struct PostDetail {
    pub uid: Option<String>,
    pub publication_date: Option<DateTime<FixedOffset>>,
    pub title: Option<String>,
    pub banner_url: Option<String>,
    pub author: Option<String>,
    pub content: Vec<ContentBlock>,
}

impl PostDetail {
    /// Assemble a detail model from a raw document
    pub fn from_raw(raw: RawPost) -> Self {
        let data = raw.data;
        Self {
            uid: raw.uid,
            publication_date: raw
                .first_publication_date
                .as_deref()
                .and_then(parse_publication_date),
            title: data.title,
            banner_url: data.banner.and_then(|b| b.url),
            author: data.author,
            content: data
                .content
                .into_iter()
                .map(|c| ContentBlock {
                    heading: c.heading,
                    body: c.body,
                })
                .collect(),
        }
    }

    /// Render every content block body to HTML
    pub fn render_content(&self, renderer: &RichTextRenderer) -> Vec<RenderedBlock> {
        self.content
            .iter()
            .map(|block| RenderedBlock {
                heading: block.heading.clone().unwrap_or_default(),
                body: renderer.render(&block.body),
            })
            .collect()
    }

    /// Estimated reading time over the rendered content
    pub fn time_to_read(&self, renderer: &RichTextRenderer) -> ReadingTime {
        ReadingTime::estimate(&self.render_content(renderer))
    }
}
