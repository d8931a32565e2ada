#![doc = "wp-sync-core: core pipeline for wp-sync."]

//! This crate holds the data model, the WordPress client, the Markdown
//! renderer, the stale-file pruner, the git publisher and the orchestration
//! that ties them together. The CLI crate only loads configuration and calls
//! [`synchronise::synchronise`].

pub mod config;
pub mod contract;
pub mod error;
pub mod fetch;
pub mod images;
pub mod prune;
pub mod publish;
pub mod render;
pub mod synchronise;

pub use config::SyncConfig;
pub use error::{PublishError, SyncError};
pub use synchronise::{synchronise, PublishOutcome, SynchroniseReport};
