//! Repository client for the blog backend.
//!
//! One method per HTTP call, one attempt per call. Callers see either the
//! parsed JSON or an [`ApiError`]; nothing here retries or caches.

mod client;

pub use client::BlogClient;

use crate::model::{Page, Post, PostDraft, PostId};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status.
    #[error("HTTP error! status: {status}")]
    Status { status: u16 },
    /// The request never completed (connect failure, reset, timeout).
    #[error("network error")]
    Network(#[source] reqwest::Error),
    #[error("invalid response body")]
    Decode(#[source] reqwest::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status } => Some(*status),
            _ => None,
        }
    }

    /// The message followed by its source chain, `outer: inner: ...`.
    pub fn detail(&self) -> String {
        let mut text = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(e) = source {
            text.push_str(": ");
            text.push_str(&e.to_string());
            source = e.source();
        }
        text
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e)
        } else if let Some(status) = e.status() {
            ApiError::Status {
                status: status.as_u16(),
            }
        } else {
            ApiError::Network(e)
        }
    }
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// All posts, newest first as sorted by the server.
    async fn list_posts(&self) -> Result<Vec<Post>, ApiError>;
    /// `Ok(None)` when the slug is absent from the page collection.
    async fn fetch_page(&self, slug: &str) -> Result<Option<Page>, ApiError>;
    async fn create_post(&self, draft: &PostDraft) -> Result<Post, ApiError>;
    async fn update_post(&self, id: &PostId, draft: &PostDraft) -> Result<Post, ApiError>;
    async fn delete_post(&self, id: &PostId) -> Result<bool, ApiError>;
}
