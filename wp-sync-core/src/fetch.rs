//! Reading from the WordPress REST API.
//!
//! [`WordPressClient`] is the reqwest-backed [`WordPressApi`]. The free
//! functions [`resolve_categories`] and [`fetch_posts`] sit on top of any
//! implementation and apply the degrade policy: an unreachable endpoint or an
//! error status yields an empty result, a body that does not parse is fatal.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::config::{HttpConfig, SyncConfig};
use crate::contract::{Category, CategoryMap, Post, WordPressApi};
use crate::error::SyncError;

pub struct WordPressClient {
    client: Client,
    posts_base: String,
    categories_url: String,
}

impl WordPressClient {
    pub fn new(config: &SyncConfig) -> Result<Self, SyncError> {
        let client = build_client(&config.http)?;
        Ok(Self {
            client,
            posts_base: config.posts_endpoint(),
            categories_url: config.categories_url(),
        })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, SyncError> {
        debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SyncError::Transport {
                endpoint: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(SyncError::Status {
                endpoint: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SyncError> {
        let body = self
            .get(url)
            .await?
            .text()
            .await
            .map_err(|e| SyncError::Transport {
                endpoint: url.to_string(),
                reason: e.to_string(),
            })?;
        serde_json::from_str(&body).map_err(|source| SyncError::Parse {
            endpoint: url.to_string(),
            source,
        })
    }
}

fn build_client(http: &HttpConfig) -> Result<Client, SyncError> {
    let mut builder = Client::builder().user_agent(http.user_agent.clone());
    if let Some(secs) = http.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().map_err(SyncError::HttpClient)
}

#[async_trait]
impl WordPressApi for WordPressClient {
    async fn fetch_categories(&self) -> Result<Vec<Category>, SyncError> {
        self.get_json(&self.categories_url).await
    }

    async fn fetch_posts(&self, per_page: u32) -> Result<Vec<Post>, SyncError> {
        let url = format!("{}?per_page={}", self.posts_base, per_page);
        self.get_json(&url).await
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, SyncError> {
        let bytes = self
            .get(url)
            .await?
            .bytes()
            .await
            .map_err(|e| SyncError::Transport {
                endpoint: url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(bytes.to_vec())
    }
}

/// Build the id → name map. Transport failures give an empty map.
pub async fn resolve_categories<A>(api: &A) -> Result<CategoryMap, SyncError>
where
    A: WordPressApi + ?Sized,
{
    match api.fetch_categories().await {
        Ok(categories) => {
            info!(count = categories.len(), "Resolved categories");
            Ok(categories.into_iter().map(|c| (c.id, c.name)).collect())
        }
        Err(e) if e.is_transport() => {
            warn!(error = %e, "Category fetch failed, continuing without category names");
            Ok(CategoryMap::new())
        }
        Err(e) => Err(e),
    }
}

/// Fetch the most recent `page_size` posts. Transport failures give no posts.
pub async fn fetch_posts<A>(api: &A, page_size: u32) -> Result<Vec<Post>, SyncError>
where
    A: WordPressApi + ?Sized,
{
    match api.fetch_posts(page_size).await {
        Ok(posts) => {
            info!(count = posts.len(), page_size, "Fetched posts");
            Ok(posts)
        }
        Err(e) if e.is_transport() => {
            warn!(error = %e, "Post fetch failed, continuing with no posts");
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}
