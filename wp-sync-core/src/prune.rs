//! Removing files generated by a previous run.
//!
//! Two strategies decide ownership:
//! - marker: a `.md` file is ours when its content contains the marker string;
//! - manifest: a file is ours when the previous run listed it in
//!   [`MANIFEST_FILE`].
//!
//! Files that are not ours are never touched.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{PruneConfig, PruneStrategy};
use crate::error::SyncError;

pub const MANIFEST_FILE: &str = ".wp-sync-manifest.json";
const MARKDOWN_EXT: &str = ".md";

/// File names written by one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub files: Vec<String>,
}

impl Manifest {
    /// Missing manifest reads as empty.
    pub fn load(dir: &Path) -> Result<Self, SyncError> {
        let path = dir.join(MANIFEST_FILE);
        match fs::read_to_string(&path) {
            Ok(text) => {
                serde_json::from_str(&text).map_err(|source| SyncError::Manifest { path, source })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(SyncError::io(path, e)),
        }
    }

    pub fn save(&self, dir: &Path) -> Result<(), SyncError> {
        let path = dir.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(self)
            .map_err(|source| SyncError::Manifest {
                path: path.clone(),
                source,
            })?;
        fs::write(&path, json).map_err(|e| SyncError::io(&path, e))?;
        debug!(path = %path.display(), files = self.files.len(), "Saved manifest");
        Ok(())
    }
}

/// Run the configured strategy. Returns the deleted file names, sorted.
pub fn prune_stale(dir: &Path, config: &PruneConfig, marker: &str) -> Result<Vec<String>, SyncError> {
    let deleted = match config.strategy {
        PruneStrategy::Marker => prune_by_marker(dir, marker)?,
        PruneStrategy::Manifest => prune_by_manifest(dir)?,
    };
    info!(strategy = ?config.strategy, deleted = deleted.len(), "Pruned stale posts");
    Ok(deleted)
}

/// Delete every `*.md` directly under `dir` whose content contains `marker`.
pub fn prune_by_marker(dir: &Path, marker: &str) -> Result<Vec<String>, SyncError> {
    if marker.is_empty() {
        warn!("Empty marker would match every file, skipping prune");
        return Ok(Vec::new());
    }

    let mut deleted = Vec::new();
    for name in markdown_files(dir)? {
        let path = dir.join(&name);
        let bytes = fs::read(&path).map_err(|e| SyncError::io(&path, e))?;
        if String::from_utf8_lossy(&bytes).contains(marker) {
            delete(&path, &name)?;
            deleted.push(name);
        } else {
            debug!(file = %name, "No marker, keeping");
        }
    }
    Ok(deleted)
}

/// Delete the files the previous run's manifest lists, if they still exist.
pub fn prune_by_manifest(dir: &Path) -> Result<Vec<String>, SyncError> {
    let manifest = Manifest::load(dir)?;
    let mut names: Vec<String> = manifest
        .files
        .into_iter()
        .filter(|name| is_plain_markdown_name(name))
        .collect();
    names.sort();
    names.dedup();

    let mut deleted = Vec::new();
    for name in names {
        let path = dir.join(&name);
        if path.is_file() {
            delete(&path, &name)?;
            deleted.push(name);
        }
    }
    Ok(deleted)
}

fn markdown_files(dir: &Path) -> Result<Vec<String>, SyncError> {
    let entries = fs::read_dir(dir).map_err(|e| SyncError::io(dir, e))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SyncError::io(dir, e))?;
        let is_file = entry
            .file_type()
            .map_err(|e| SyncError::io(entry.path(), e))?
            .is_file();
        if let Some(name) = entry.file_name().to_str() {
            if is_file && name.ends_with(MARKDOWN_EXT) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

// Manifest entries must not escape the output directory.
fn is_plain_markdown_name(name: &str) -> bool {
    name.ends_with(MARKDOWN_EXT)
        && !name.contains(['/', '\\'])
        && name != ".."
        && Path::new(name).file_name().and_then(|n| n.to_str()) == Some(name)
}

fn delete(path: &Path, name: &str) -> Result<(), SyncError> {
    fs::remove_file(path).map_err(|e| SyncError::io(path, e))?;
    info!(path = %path.display(), "Deleted stale post");
    println!("🗑️ Deleted stale post: {name}");
    Ok(())
}
