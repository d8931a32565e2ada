//! High-level pipeline: prune → categories → posts → render → publish.
//!
//! [`synchronise`] runs one complete sync against a [`WordPressApi`] and a
//! [`CommandRunner`]. The steps are strictly sequential:
//!   1. ensure the output directory exists
//!   2. prune files from the previous run (when enabled)
//!   3. resolve the category map (empty on transport failure)
//!   4. fetch the most recent posts (none on transport failure)
//!   5. render every published post; others are skipped silently
//!   6. stage, commit and push (when enabled), even if nothing changed
//!
//! # Error Handling
//! Parse and filesystem errors abort the run with a [`SyncError`]. A failed
//! publish is contained: it is printed once and recorded in the report as
//! [`PublishOutcome::Failed`].

use std::fs;
use std::path::PathBuf;

use tracing::{debug, error, info, warn};

use crate::config::{PruneStrategy, SyncConfig};
use crate::contract::{CommandRunner, Post, WordPressApi};
use crate::error::SyncError;
use crate::fetch::{fetch_posts, resolve_categories};
use crate::images::localize_images;
use crate::prune::{prune_stale, Manifest};
use crate::publish::{GitStep, Publisher};
use crate::render::{is_invalid_content, render_post_with_body, write_post};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Pushed,
    Failed { step: GitStep, message: String },
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPost {
    pub id: u64,
    pub slug: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotPublished(String),
    InvalidContent,
}

#[derive(Debug)]
pub struct SynchroniseReport {
    pub deleted: Vec<String>,
    pub written: Vec<PathBuf>,
    pub skipped: Vec<SkippedPost>,
    pub publish: PublishOutcome,
}

pub async fn synchronise<A, R>(
    config: &SyncConfig,
    api: &A,
    runner: &R,
) -> Result<SynchroniseReport, SyncError>
where
    A: WordPressApi + ?Sized,
    R: CommandRunner + ?Sized,
{
    info!("[SYNC] Starting WordPress synchronisation");
    let output_dir = config.output_dir.as_path();

    fs::create_dir_all(output_dir).map_err(|e| SyncError::io(output_dir, e))?;

    let deleted = if config.prune.enabled {
        prune_stale(output_dir, &config.prune, &config.marker)?
    } else {
        debug!("[SYNC] Pruning disabled");
        Vec::new()
    };

    let categories = resolve_categories(api).await?;
    let posts = fetch_posts(api, config.page_size).await?;

    let mut written = Vec::new();
    let mut skipped = Vec::new();
    for post in &posts {
        if !post.status.is_published() {
            debug!(post_id = post.id, status = post.status.as_str(), "[SYNC] Skipping unpublished post");
            skipped.push(skip(post, SkipReason::NotPublished(post.status.as_str().to_string())));
            continue;
        }
        if config.skip_invalid_content && is_invalid_content(&post.content.rendered) {
            warn!(post_id = post.id, slug = %post.slug, "[SYNC] Skipping post with invalid content");
            println!("⚠️ Skipping invalid post: {}", post.slug);
            skipped.push(skip(post, SkipReason::InvalidContent));
            continue;
        }

        let body = if config.images.enabled {
            localize_images(api, post, &config.images).await?
        } else {
            post.content.rendered.clone()
        };
        let rendered = render_post_with_body(post, &body, &categories, config)?;
        written.push(write_post(output_dir, &rendered)?);
    }
    info!(written = written.len(), skipped = skipped.len(), "[SYNC] Rendered posts");

    if config.prune.strategy == PruneStrategy::Manifest {
        let files = written
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
            .collect();
        Manifest { files }.save(output_dir)?;
    }

    let publish = if config.publish.enabled {
        match Publisher::new(runner, &config.publish).publish() {
            Ok(()) => {
                info!("[SYNC] Published to remote");
                println!("🚀 Pushed to remote");
                PublishOutcome::Pushed
            }
            Err(e) => {
                error!(error = %e, "[SYNC][ERROR] Publish failed");
                println!("❌ Git operation failed: {e}");
                PublishOutcome::Failed {
                    step: e.step(),
                    message: e.to_string(),
                }
            }
        }
    } else {
        debug!("[SYNC] Publishing disabled");
        PublishOutcome::Disabled
    };

    Ok(SynchroniseReport {
        deleted,
        written,
        skipped,
        publish,
    })
}

fn skip(post: &Post, reason: SkipReason) -> SkippedPost {
    SkippedPost {
        id: post.id,
        slug: post.slug.clone(),
        reason,
    }
}
