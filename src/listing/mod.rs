//! Paginated post listing
//!
//! The listing starts from a first page supplied by the caller and grows
//! one page at a time by following the `next_page` cursor.

use std::collections::HashSet;

use crate::client::{ContentError, PageFetcher};
use crate::content::{PostSummary, RawPage};

/// Accumulated summaries plus the cursor of the next page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingState {
    posts: Vec<PostSummary>,
    next_cursor: Option<String>,
}

impl ListingState {
    /// Summaries in arrival order
    pub fn posts(&self) -> &[PostSummary] {
        &self.posts
    }

    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref()
    }

    /// Whether another page can be loaded
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}

/// Outcome of [`ListingController::load_more`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMore {
    /// No cursor left; nothing was requested
    Exhausted,
    /// A page was fetched and this many summaries were appended
    Loaded { appended: usize },
}

/// Owns the listing state and loads further pages on demand
///
/// `load_more` takes `&mut self`, so at most one page request is in flight
/// per controller.
pub struct ListingController<F> {
    fetcher: F,
    state: ListingState,
    dedupe_by_uid: bool,
    pages_loaded: usize,
    /// Cursors already fetched; a repeated one ends the listing
    fetched_cursors: HashSet<String>,
}

impl<F: PageFetcher> ListingController<F> {
    /// Build the listing from an already fetched first page. No I/O.
    pub fn initialize(fetcher: F, first_page: RawPage) -> Self {
        let posts = first_page
            .results
            .into_iter()
            .map(PostSummary::from_raw)
            .collect();

        Self {
            fetcher,
            state: ListingState {
                posts,
                next_cursor: first_page.next_page,
            },
            dedupe_by_uid: false,
            pages_loaded: 1,
            fetched_cursors: HashSet::new(),
        }
    }

    /// Drop summaries whose uid is already listed when loading more pages
    pub fn with_dedupe_by_uid(mut self, dedupe: bool) -> Self {
        self.dedupe_by_uid = dedupe;
        self
    }

    pub fn state(&self) -> &ListingState {
        &self.state
    }

    pub fn into_state(self) -> ListingState {
        self.state
    }

    /// Number of pages in the listing, the first one included
    pub fn pages_loaded(&self) -> usize {
        self.pages_loaded
    }

    /// Fetch the page at the current cursor and append it
    ///
    /// Without a cursor this is a no-op. On failure the state is left
    /// untouched, so the same cursor is used by the next call.
    pub async fn load_more(&mut self) -> Result<LoadMore, ContentError> {
        let Some(cursor) = self.state.next_cursor.as_deref() else {
            return Ok(LoadMore::Exhausted);
        };

        tracing::debug!("Loading listing page {} from cursor", self.pages_loaded + 1);
        let page = self.fetcher.fetch_page(cursor).await?;

        let mut summaries: Vec<PostSummary> =
            page.results.into_iter().map(PostSummary::from_raw).collect();
        if self.dedupe_by_uid {
            let mut seen: HashSet<String> = self
                .state
                .posts
                .iter()
                .filter_map(|p| p.uid.clone())
                .collect();
            summaries.retain(|p| match &p.uid {
                Some(uid) => seen.insert(uid.clone()),
                None => true,
            });
        }

        self.fetched_cursors.insert(cursor.to_string());

        let appended = summaries.len();
        self.state.posts.extend(summaries);
        self.state.next_cursor = match page.next_page {
            Some(next) if self.fetched_cursors.contains(&next) => {
                tracing::warn!("Cursor {:?} was already fetched, ending the listing", next);
                None
            }
            next => next,
        };
        self.pages_loaded += 1;

        Ok(LoadMore::Loaded { appended })
    }

    /// Load pages until the listing holds `pages` pages or runs out
    pub async fn load_pages(&mut self, pages: usize) -> Result<(), ContentError> {
        while self.pages_loaded < pages {
            if self.load_more().await? == LoadMore::Exhausted {
                break;
            }
        }
        Ok(())
    }

    /// Load every remaining page
    pub async fn load_all(&mut self) -> Result<(), ContentError> {
        while self.load_more().await? != LoadMore::Exhausted {}
        Ok(())
    }
}
