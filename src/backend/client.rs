use super::{ApiError, PostRepository};
use crate::model::{ClientConfig, Page, PageCollection, Post, PostDraft, PostId};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

/// HTTP implementation of [`PostRepository`] against a json-server style backend.
pub struct BlogClient {
    http: Client,
    base: Url,
}

impl BlogClient {
    pub fn new(cfg: &ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(cfg.user_agent.clone())
            .timeout(cfg.timeout)
            .build()
            .context("build HTTP client")?;
        let base = Url::parse(&cfg.base_url)
            .with_context(|| format!("invalid base URL {}", cfg.base_url))?;
        if base.cannot_be_a_base() {
            anyhow::bail!("invalid base URL {}: no path", cfg.base_url);
        }
        Ok(Self { http, base })
    }

    /// `base` plus `segments`, each percent-encoded as a single path segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // Checked in `new`: the base always has a path.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn post_url(&self, id: &PostId) -> Url {
        self.endpoint(&["posts", &id.to_string()])
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let resp = req.send().await.map_err(ApiError::Network)?;
        let status = resp.status();
        debug!(%status, url = %resp.url(), "response");
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }
        Ok(resp)
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let resp = self.send(req).await?;
        Ok(resp.json::<T>().await?)
    }
}

#[async_trait]
impl PostRepository for BlogClient {
    async fn list_posts(&self) -> Result<Vec<Post>, ApiError> {
        let url = self.endpoint(&["posts"]);
        info!(%url, "fetching posts");
        self.send_json(
            self.http
                .get(url)
                .query(&[("_sort", "id"), ("_order", "desc")]),
        )
        .await
    }

    async fn fetch_page(&self, slug: &str) -> Result<Option<Page>, ApiError> {
        // The backend only serves the whole keyed collection, so the lookup is local.
        info!(slug, "fetching page");
        let mut pages: PageCollection = self.send_json(self.http.get(self.endpoint(&["pages"]))).await?;
        Ok(pages.remove(slug))
    }

    async fn create_post(&self, draft: &PostDraft) -> Result<Post, ApiError> {
        let url = self.endpoint(&["posts"]);
        info!(%url, title = %draft.title, "creating post");
        self.send_json(self.http.post(url).json(draft)).await
    }

    async fn update_post(&self, id: &PostId, draft: &PostDraft) -> Result<Post, ApiError> {
        let url = self.post_url(id);
        info!(%url, "updating post");
        self.send_json(self.http.put(url).json(draft)).await
    }

    async fn delete_post(&self, id: &PostId) -> Result<bool, ApiError> {
        let url = self.post_url(id);
        info!(%url, "deleting post");
        self.send(self.http.delete(url)).await?;
        Ok(true)
    }
}

#[cfg(test)]
#[path = "tests/client_tests.rs"]
mod tests;
