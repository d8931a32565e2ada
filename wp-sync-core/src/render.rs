//! Turning a [`Post`] into a front-matter Markdown file.
//!
//! The body is the post's HTML exactly as WordPress rendered it; only the YAML
//! front matter is generated. Rendering is pure and deterministic, writing is
//! a separate step so tests can inspect the output without touching disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::config::SyncConfig;
use crate::contract::{CategoryMap, Post};
use crate::error::SyncError;

pub const FRONT_MATTER_DELIMITER: &str = "---";

/// Characters dropped from slugs before they become file names.
static UNSAFE_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\\/*?:"<>|!]"#).expect("static regex"));

/// Content markers of posts that failed to render upstream.
const INVALID_CONTENT_MARKERS: &[&str] = &["Page Not Found"];

#[derive(Debug, Serialize)]
struct FrontMatter<'a> {
    title: &'a str,
    date: &'a str,
    author: &'a str,
    categories: Vec<String>,
    tags: &'a [String],
}

/// A rendered document, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPost {
    pub file_name: String,
    pub content: String,
}

/// Slug to file stem: spaces become `_`, path and shell metacharacters are
/// dropped. Empty results fall back to `post-{id}`.
pub fn sanitize_stem(slug: &str, id: u64) -> String {
    let underscored = slug.replace(' ', "_");
    let stem = UNSAFE_FILENAME_CHARS.replace_all(&underscored, "");
    if stem.is_empty() {
        format!("post-{id}")
    } else {
        stem.into_owned()
    }
}

/// [`sanitize_stem`] with `.md` appended.
pub fn sanitize_filename(slug: &str, id: u64) -> String {
    format!("{}.md", sanitize_stem(slug, id))
}

/// Resolve category ids in order, substituting `placeholder` for unknown ids.
pub fn category_names(ids: &[u64], categories: &CategoryMap, placeholder: &str) -> Vec<String> {
    ids.iter()
        .map(|id| {
            categories
                .get(id)
                .cloned()
                .unwrap_or_else(|| placeholder.to_string())
        })
        .collect()
}

/// Whether a post body looks like a failed upstream render.
pub fn is_invalid_content(html: &str) -> bool {
    html.trim().is_empty() || INVALID_CONTENT_MARKERS.iter().any(|m| html.contains(m))
}

/// Render with the post's own HTML as body.
pub fn render_post(
    post: &Post,
    categories: &CategoryMap,
    config: &SyncConfig,
) -> Result<RenderedPost, SyncError> {
    render_post_with_body(post, &post.content.rendered, categories, config)
}

/// Render with a substitute body (e.g. after image URLs were rewritten).
pub fn render_post_with_body(
    post: &Post,
    body: &str,
    categories: &CategoryMap,
    config: &SyncConfig,
) -> Result<RenderedPost, SyncError> {
    let front_matter = FrontMatter {
        title: &post.title.rendered,
        date: &post.date,
        author: &config.marker,
        categories: category_names(&post.categories, categories, &config.uncategorized_label),
        tags: &config.default_tags,
    };
    let yaml = serde_yaml::to_string(&front_matter).map_err(|source| SyncError::FrontMatter {
        slug: post.slug.clone(),
        source,
    })?;

    let file_name = sanitize_filename(&post.slug, post.id);
    debug!(post_id = post.id, file = %file_name, "Rendered post");
    Ok(RenderedPost {
        file_name,
        content: format!("{FRONT_MATTER_DELIMITER}\n{yaml}{FRONT_MATTER_DELIMITER}\n{body}"),
    })
}

/// Write (or overwrite) the rendered file into `dir`.
pub fn write_post(dir: &Path, rendered: &RenderedPost) -> Result<PathBuf, SyncError> {
    let path = dir.join(&rendered.file_name);
    fs::write(&path, &rendered.content).map_err(|e| SyncError::io(&path, e))?;
    println!("✅ Wrote post: {}", rendered.file_name);
    Ok(path)
}
