use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

pub const DEFAULT_SITE_BASE: &str = "https://blziyuan21.com";
pub const DEFAULT_OUTPUT_DIR: &str = "source/_posts";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_MARKER: &str = "WordPress Sync";
pub const DEFAULT_COMMIT_MESSAGE: &str = "Sync latest WordPress posts";
pub const DEFAULT_UNCATEGORIZED: &str = "Uncategorized";

/// Everything one sync run needs. Every field has a default, so an empty YAML
/// document (or no file at all) yields the stock behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Site root, e.g. `https://example.com`. The REST paths are appended to it.
    pub site_base: String,
    pub output_dir: PathBuf,
    pub page_size: u32,
    /// Substring embedded in generated files; the marker pruner deletes any
    /// `.md` file containing it.
    pub marker: String,
    pub uncategorized_label: String,
    pub default_tags: Vec<String>,
    pub skip_invalid_content: bool,
    pub prune: PruneConfig,
    pub http: HttpConfig,
    pub images: ImageConfig,
    pub publish: PublishConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            site_base: DEFAULT_SITE_BASE.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            page_size: DEFAULT_PAGE_SIZE,
            marker: DEFAULT_MARKER.to_string(),
            uncategorized_label: DEFAULT_UNCATEGORIZED.to_string(),
            default_tags: Vec::new(),
            skip_invalid_content: false,
            prune: PruneConfig::default(),
            http: HttpConfig::default(),
            images: ImageConfig::default(),
            publish: PublishConfig::default(),
        }
    }
}

impl SyncConfig {
    /// Posts collection endpoint, without the `per_page` query.
    pub fn posts_endpoint(&self) -> String {
        format!("{}/wp-json/wp/v2/posts", self.site_root())
    }

    pub fn categories_url(&self) -> String {
        format!("{}/wp-json/wp/v2/categories", self.site_root())
    }

    pub fn site_root(&self) -> &str {
        self.site_base.trim_end_matches('/')
    }

    pub fn trace_loaded(&self) {
        info!(
            site_base = %self.site_base,
            output_dir = %self.output_dir.display(),
            page_size = self.page_size,
            prune = self.prune.enabled,
            publish = self.publish.enabled,
            "Loaded SyncConfig"
        );
        debug!(?self, "SyncConfig loaded (full debug)");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PruneStrategy {
    /// Delete every `.md` file whose content contains the marker.
    #[default]
    Marker,
    /// Delete exactly the files the previous run recorded in its manifest.
    Manifest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PruneConfig {
    pub enabled: bool,
    pub strategy: PruneStrategy,
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            strategy: PruneStrategy::Marker,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    /// No timeout unless set.
    pub timeout_secs: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("wp-sync/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub enabled: bool,
    pub dir: PathBuf,
    /// Public URL prefix the rewritten `src` attributes point at.
    pub url_prefix: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: PathBuf::from("source/images/wp"),
            url_prefix: "/images/wp".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    pub enabled: bool,
    pub commit_message: String,
    pub add_paths: Vec<String>,
    pub remote: Option<String>,
    pub branch: Option<String>,
    /// Directory the git commands run in.
    pub workdir: PathBuf,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
            add_paths: vec![".".to_string()],
            remote: None,
            branch: None,
            workdir: PathBuf::from("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_ignore_trailing_slash() {
        let config = SyncConfig {
            site_base: "https://example.com/".into(),
            page_size: 5,
            ..SyncConfig::default()
        };
        assert_eq!(
            config.posts_endpoint(),
            "https://example.com/wp-json/wp/v2/posts"
        );
        assert_eq!(
            config.categories_url(),
            "https://example.com/wp-json/wp/v2/categories"
        );
    }

    #[test]
    fn defaults_match_stock_behaviour() {
        let config = SyncConfig::default();
        assert_eq!(config.page_size, 10);
        assert!(config.prune.enabled);
        assert_eq!(config.prune.strategy, PruneStrategy::Marker);
        assert!(config.publish.enabled);
        assert_eq!(config.publish.add_paths, vec!["."]);
        assert!(!config.images.enabled);
        assert!(config.default_tags.is_empty());
    }
}
