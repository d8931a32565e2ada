///
/// This module implements the CLI interface for wp-sync: command parsing,
/// configuration loading and the user-visible run summary.
///
/// All pipeline logic (fetching, rendering, pruning, publishing) lives in the
/// [`wp-sync-core`] crate. This module is strictly CLI glue.
///
/// ## How To Use
/// - From the command line: `wp-sync sync [--config wp-sync.yaml]`.
/// - Programmatically or from integration tests: call [`run`] with a constructed [`Cli`].
///
/// [`wp-sync-core`]: ../../wp-sync-core/
use crate::load_config::load_config;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wp_sync_core::fetch::WordPressClient;
use wp_sync_core::publish::SystemCommandRunner;
use wp_sync_core::synchronise::{synchronise, PublishOutcome, SynchroniseReport};

/// CLI for wp-sync: mirror WordPress posts into a static-site source tree.
#[derive(Parser)]
#[clap(
    name = "wp-sync",
    version,
    about = "Synchronise WordPress posts into front-matter Markdown and push them with git"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch posts, rewrite the output directory and publish it
    Sync {
        /// Path to a YAML config file; built-in defaults are used when omitted
        #[clap(long)]
        config: Option<PathBuf>,

        /// Write files but skip git add/commit/push
        #[clap(long)]
        no_publish: bool,

        /// Keep files from previous runs
        #[clap(long)]
        no_prune: bool,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Sync {
            config,
            no_publish,
            no_prune,
        } => {
            let mut config = load_config(config)?;
            if no_publish {
                config.publish.enabled = false;
            }
            if no_prune {
                config.prune.enabled = false;
            }
            config.trace_loaded();

            tracing::info!(command = "sync", "Starting synchronisation");
            println!("Synchronise starting...");
            let client =
                WordPressClient::new(&config).context("Failed to construct WordPress client")?;
            match synchronise(&config, &client, &SystemCommandRunner).await {
                Ok(report) => {
                    tracing::info!(command = "sync", ?report, "Synchronisation complete");
                    print_summary(&report);
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "sync", error = %e, "Synchronisation failed");
                    Err(anyhow::Error::new(e).context("Synchronisation failed"))
                }
            }
        }
    }
}

fn print_summary(report: &SynchroniseReport) {
    println!("Synchronise complete.");
    println!("  deleted: {}", report.deleted.len());
    println!("  written: {}", report.written.len());
    println!("  skipped: {}", report.skipped.len());
    let publish = match &report.publish {
        PublishOutcome::Pushed => "pushed".to_string(),
        PublishOutcome::Failed { step, .. } => format!("failed at git {step}"),
        PublishOutcome::Disabled => "disabled".to_string(),
    };
    println!("  publish: {publish}");
}
