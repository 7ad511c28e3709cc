//! Posts feed state for the authenticated view.
//!
//! DESIGN
//! ======
//! The feed caches one list read per entry into the authenticated view.
//! An empty cache renders the loading placeholder, so an empty backend
//! response is indistinguishable from a read still in flight.
//!
//! Creating a post does not touch the cached list; the new post shows up
//! only after the next authenticated entry re-reads the feed.

#[cfg(test)]
#[path = "feed_test.rs"]
mod feed_test;

use std::sync::Arc;

use crate::net::posts::PostsBackend;
use crate::net::types::{Post, PostsError};

pub const LOADING_PLACEHOLDER: &str = "Loading your posts....";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Content,
}

/// What the feed area shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedView<'a> {
    Loading,
    Posts(&'a [Post]),
}

impl FeedView<'_> {
    /// Display lines, one per entry.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Loading => vec![LOADING_PLACEHOLDER.to_owned()],
            Self::Posts(posts) => posts.iter().map(|p| format!("{}, {}", p.name, p.content)).collect(),
        }
    }
}

pub struct PostsFeed {
    backend: Arc<dyn PostsBackend>,
    posts: Vec<Post>,
    draft: Post,
    notice: Option<String>,
}

impl PostsFeed {
    pub fn new(backend: Arc<dyn PostsBackend>) -> Self {
        Self {
            backend,
            posts: Vec::new(),
            draft: Post { name: String::new(), content: String::new() },
            notice: None,
        }
    }

    /// Read the feed and replace the cache.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the cache and placeholder are left as-is
    /// and the error text becomes the feed notice.
    pub async fn load(&mut self) -> Result<(), PostsError> {
        match self.backend.list_posts().await {
            Ok(posts) => {
                tracing::debug!(count = posts.len(), "feed loaded");
                self.posts = posts;
                self.notice = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "feed load failed");
                self.notice = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Drop cached posts, returning the feed to its placeholder.
    pub fn reset(&mut self) {
        self.posts.clear();
        self.notice = None;
    }

    #[must_use]
    pub fn view(&self) -> FeedView<'_> {
        if self.posts.is_empty() { FeedView::Loading } else { FeedView::Posts(&self.posts) }
    }

    #[must_use]
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn input(&mut self, field: DraftField, value: impl Into<String>) {
        match field {
            DraftField::Name => self.draft.name = value.into(),
            DraftField::Content => self.draft.content = value.into(),
        }
    }

    #[must_use]
    pub fn draft(&self) -> &Post {
        &self.draft
    }

    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Send the current draft to the backend. The cached list is unchanged.
    ///
    /// # Errors
    ///
    /// Returns the backend error, also kept as the feed notice.
    pub async fn create(&mut self) -> Result<(), PostsError> {
        match self.backend.create_post(&self.draft).await {
            Ok(()) => {
                tracing::info!(name = %self.draft.name, "post created");
                self.notice = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "post create failed");
                self.notice = Some(e.to_string());
                Err(e)
            }
        }
    }
}
