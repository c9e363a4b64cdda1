//! Raw documents as delivered by the content repository
//!
//! Every field is optional or defaulted: a record missing a field still
//! decodes, and the absence flows downstream as `None` or an empty value.

use serde::{Deserialize, Deserializer, Serialize};

use super::RichText;

/// One page of a paginated query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPage {
    pub page: Option<u32>,
    pub results_per_page: Option<u32>,
    pub total_results_size: Option<u32>,
    pub total_pages: Option<u32>,
    #[serde(deserialize_with = "null_as_default")]
    pub results: Vec<RawPost>,
    /// Opaque cursor for the following page (a URL)
    pub next_page: Option<String>,
}

impl RawPage {
    pub fn new(results: Vec<RawPost>, next_page: Option<String>) -> Self {
        Self {
            results,
            next_page,
            ..Default::default()
        }
    }
}

/// A post document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPost {
    pub id: Option<String>,
    pub uid: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub first_publication_date: Option<String>,
    pub last_publication_date: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub data: RawPostData,
}

/// Custom fields of a post document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPostData {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub author: Option<String>,
    pub banner: Option<RawImage>,
    #[serde(deserialize_with = "null_as_default")]
    pub content: Vec<RawContent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawImage {
    pub url: Option<String>,
    pub alt: Option<String>,
}

/// One entry of the `content` group field
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawContent {
    pub heading: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub body: RichText,
}

/// Treat an explicit `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
