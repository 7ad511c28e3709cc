//! REST client for the posts backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend authenticates requests by session cookie, so the HTTP client
//! keeps a cookie store and every call rides on whatever session the browser
//! side established. The write response body is never consumed.

#[cfg(test)]
#[path = "posts_test.rs"]
mod posts_test;

use super::types::{Post, PostsError};
use crate::config::ConfigError;

/// Storage for feed posts.
#[async_trait::async_trait]
pub trait PostsBackend: Send + Sync {
    /// Fetch the feed in backend order.
    async fn list_posts(&self) -> Result<Vec<Post>, PostsError>;

    /// Store a new post.
    async fn create_post(&self, post: &Post) -> Result<(), PostsError>;
}

fn posts_endpoint(base_url: &str) -> String {
    format!("{base_url}/posts")
}

/// [`PostsBackend`] speaking `GET /posts` and `POST /posts`.
pub struct HttpPostsBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpPostsBackend {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ConfigError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }
}

#[async_trait::async_trait]
impl PostsBackend for HttpPostsBackend {
    async fn list_posts(&self) -> Result<Vec<Post>, PostsError> {
        let resp = self
            .http
            .get(posts_endpoint(&self.base_url))
            .send()
            .await
            .map_err(|e| PostsError::Network(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(PostsError::Status(resp.status().as_u16()));
        }
        let text = resp.text().await.map_err(|e| PostsError::Network(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| PostsError::Decode(e.to_string()))
    }

    async fn create_post(&self, post: &Post) -> Result<(), PostsError> {
        let resp = self
            .http
            .post(posts_endpoint(&self.base_url))
            .json(post)
            .send()
            .await
            .map_err(|e| PostsError::Network(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(PostsError::Status(resp.status().as_u16()));
        }
        Ok(())
    }
}
