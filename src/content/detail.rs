//! Post detail assembly

use super::PostDetail;
use crate::client::{ContentClient, ContentError, POSTS_DOCUMENT_TYPE};

/// State of a post detail view
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DetailStatus {
    /// The document has not been fetched yet
    #[default]
    Loading,
    Found(Box<PostDetail>),
    /// The repository has no post with this uid
    NotFound,
}

impl DetailStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, DetailStatus::Loading)
    }

    pub fn detail(&self) -> Option<&PostDetail> {
        match self {
            DetailStatus::Found(detail) => Some(&**detail),
            _ => None,
        }
    }
}

/// Fetches one post by uid and assembles its detail model
#[derive(Debug, Clone)]
pub struct DetailAssembler {
    uid: String,
    status: DetailStatus,
}

impl DetailAssembler {
    /// Start in the `Loading` state
    pub fn new(uid: &str) -> Self {
        Self {
            uid: uid.to_string(),
            status: DetailStatus::Loading,
        }
    }

    pub fn status(&self) -> &DetailStatus {
        &self.status
    }

    pub fn into_status(self) -> DetailStatus {
        self.status
    }

    /// Fetch the post and settle the status
    ///
    /// A missing document settles as `NotFound`. Any other failure is
    /// returned and the status stays as it was.
    pub async fn load<C>(&mut self, client: &C) -> Result<&DetailStatus, ContentError>
    where
        C: ContentClient + ?Sized,
    {
        self.status = match client.get_by_uid(POSTS_DOCUMENT_TYPE, &self.uid).await {
            Ok(raw) => DetailStatus::Found(Box::new(PostDetail::from_raw(raw))),
            Err(e) if e.is_not_found() => {
                tracing::debug!("Post {:?} not found", self.uid);
                DetailStatus::NotFound
            }
            Err(e) => return Err(e),
        };
        Ok(&self.status)
    }

    /// Fetch and assemble in one step
    pub async fn assemble<C>(client: &C, uid: &str) -> Result<DetailStatus, ContentError>
    where
        C: ContentClient + ?Sized,
    {
        let mut assembler = Self::new(uid);
        assembler.load(client).await?;
        Ok(assembler.into_status())
    }
}
