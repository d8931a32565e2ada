//! # contract: records and seams of the sync pipeline
//!
//! This module defines the typed records parsed from the WordPress REST API
//! ([`Post`], [`Category`]) and the two traits the orchestrator is generic over:
//!
//! - [`WordPressApi`]: the read side (categories, posts, raw bytes for images).
//! - [`CommandRunner`]: the external-process side used by the publisher.
//!
//! Both traits are annotated for `mockall`, so integration tests can drive the
//! whole pipeline without network access or a git repository. The mocks are
//! exported when the `test-export-mocks` feature is on (the default).

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::SyncError;

/// A WordPress `{ "rendered": "..." }` wrapper, used for titles and content.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Rendered {
    pub rendered: String,
}

/// Publish status of a post. WordPress reports `publish` for live posts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum PostStatus {
    Publish,
    Draft,
    Other(String),
}

impl From<String> for PostStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "publish" => PostStatus::Publish,
            "draft" => PostStatus::Draft,
            _ => PostStatus::Other(raw),
        }
    }
}

impl PostStatus {
    pub fn is_published(&self) -> bool {
        matches!(self, PostStatus::Publish)
    }

    pub fn as_str(&self) -> &str {
        match self {
            PostStatus::Publish => "publish",
            PostStatus::Draft => "draft",
            PostStatus::Other(raw) => raw,
        }
    }
}

/// A post as returned by `/wp-json/wp/v2/posts`. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: Rendered,
    pub date: String,
    pub content: Rendered,
    pub slug: String,
    #[serde(default)]
    pub categories: Vec<u64>,
    pub status: PostStatus,
}

/// A category as returned by `/wp-json/wp/v2/categories`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
}

/// Category id to display name, built once per run.
pub type CategoryMap = BTreeMap<u64, String>;

/// Read access to a WordPress site.
///
/// Implementations report transport problems as [`SyncError::Transport`] or
/// [`SyncError::Status`] and bodies they cannot parse as [`SyncError::Parse`].
/// Deciding which of those are fatal is left to the caller.
#[cfg_attr(any(test, feature = "test-export-mocks"), mockall::automock)]
#[async_trait]
pub trait WordPressApi: Send + Sync {
    /// Fetch the category list (single response, no pagination).
    async fn fetch_categories(&self) -> Result<Vec<Category>, SyncError>;

    /// Fetch the first page of posts with the given page size.
    async fn fetch_posts(&self, per_page: u32) -> Result<Vec<Post>, SyncError>;

    /// Fetch an arbitrary URL as raw bytes (used for image localization).
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, SyncError>;
}

/// How an external process ended. `code` is `None` when it was killed by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    pub code: Option<i32>,
}

impl ExitOutcome {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs an external program to completion in a working directory.
///
/// `Err` means the program could not be launched at all.
#[cfg_attr(any(test, feature = "test-export-mocks"), mockall::automock)]
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[String], workdir: &Path)
        -> std::io::Result<ExitOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_parses_from_wordpress_json() {
        let json = r#"{
            "id": 7,
            "title": {"rendered": "Caf&eacute;"},
            "date": "2024-01-01T00:00:00",
            "content": {"rendered": "<p>hi</p>", "protected": false},
            "slug": "cafe",
            "categories": [1, 2],
            "status": "publish",
            "link": "https://example.com/cafe"
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, 7);
        assert_eq!(post.title.rendered, "Caf&eacute;");
        assert_eq!(post.categories, vec![1, 2]);
        assert!(post.status.is_published());
    }

    #[test]
    fn missing_categories_default_to_empty() {
        let json = r#"{"id":1,"title":{"rendered":"t"},"date":"d","content":{"rendered":""},"slug":"s","status":"draft"}"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert!(post.categories.is_empty());
        assert_eq!(post.status, PostStatus::Draft);
    }

    #[test]
    fn unknown_status_is_kept_verbatim() {
        let status = PostStatus::from("future".to_string());
        assert_eq!(status, PostStatus::Other("future".into()));
        assert_eq!(status.as_str(), "future");
        assert!(!status.is_published());
    }

    #[test]
    fn missing_required_field_is_a_parse_error() {
        let json = r#"[{"id":1,"date":"d","content":{"rendered":""},"slug":"s","status":"publish"}]"#;
        assert!(serde_json::from_str::<Vec<Post>>(json).is_err());
    }
}
