//! Error types for the sync pipeline.
//!
//! [`SyncError`] covers everything that can go wrong while fetching, rendering
//! and pruning. Only the transport-level variants are recoverable: the fetch
//! step degrades them to empty results (see [`SyncError::is_transport`]).
//! [`PublishError`] is kept separate because the orchestrator contains it
//! instead of propagating it.

use std::path::PathBuf;

use thiserror::Error;

use crate::publish::GitStep;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),

    #[error("request to {endpoint} failed: {reason}")]
    Transport { endpoint: String, reason: String },

    #[error("{endpoint} answered with HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("could not parse response from {endpoint}")]
    Parse {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not serialise front matter for post `{slug}`")]
    FrontMatter {
        slug: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("IO error at `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("manifest `{}` is corrupt", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl SyncError {
    /// True for failures that mean "the endpoint could not be reached or said no",
    /// as opposed to a response we could not understand.
    pub fn is_transport(&self) -> bool {
        matches!(self, SyncError::Transport { .. } | SyncError::Status { .. })
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure of a single `git` invocation in the publish step.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to launch `git {step}`")]
    Launch {
        step: GitStep,
        #[source]
        source: std::io::Error,
    },

    #[error("`git {step}` exited with status {}", .code.map(|c| c.to_string()).unwrap_or_else(|| "<signal>".into()))]
    NonZeroExit { step: GitStep, code: Option<i32> },
}

impl PublishError {
    pub fn step(&self) -> GitStep {
        match self {
            PublishError::Launch { step, .. } | PublishError::NonZeroExit { step, .. } => *step,
        }
    }
}
