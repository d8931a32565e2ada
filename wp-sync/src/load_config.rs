/// `load_config` module: builds the [`SyncConfig`] for one run from defaults, an
/// optional YAML file and environment overrides.
///
/// # Responsibilities
/// - Parse the user-supplied YAML file into the core `SyncConfig` (every key
///   optional; omitted keys keep their defaults)
/// - Apply environment overrides (`WP_SYNC_SITE_BASE`, `WP_SYNC_OUTPUT_DIR`),
///   which also pick up values from a `.env` file loaded by `main`
/// - Produce clear diagnostics: any failure names the file and the cause
///
/// # Errors
/// All errors use `anyhow::Error` and surface at the CLI boundary.
use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use wp_sync_core::SyncConfig;

pub const ENV_SITE_BASE: &str = "WP_SYNC_SITE_BASE";
pub const ENV_OUTPUT_DIR: &str = "WP_SYNC_OUTPUT_DIR";

/// Loads `path` (or the built-in defaults when `None`) and applies environment overrides.
pub fn load_config<P: AsRef<Path>>(path: Option<P>) -> Result<SyncConfig> {
    let mut config = match path {
        Some(path) => read_config_file(path.as_ref())?,
        None => {
            info!("No config file given, using built-in defaults");
            SyncConfig::default()
        }
    };
    apply_env_overrides(&mut config);
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<SyncConfig> {
    info!(config_path = ?path, "Loading configuration from file");

    let content = fs::read_to_string(path).map_err(|e| {
        error!(error = ?e, config_path = ?path, "Failed to read config file");
        anyhow::anyhow!("Failed to read config file {:?}: {}", path, e)
    })?;

    // An empty file is a valid "all defaults" document.
    if content.trim().is_empty() {
        return Ok(SyncConfig::default());
    }

    let config: SyncConfig = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config YAML {:?}", path))
        .inspect_err(|e| error!(error = ?e, config_path = ?path, "Failed to parse config YAML"))?;
    info!(config_path = ?path, "Parsed config YAML successfully");
    Ok(config)
}

fn apply_env_overrides(config: &mut SyncConfig) {
    if let Some(site_base) = non_empty_var(ENV_SITE_BASE) {
        info!(site_base = %site_base, "Site base overridden from environment");
        config.site_base = site_base;
    }
    if let Some(output_dir) = non_empty_var(ENV_OUTPUT_DIR) {
        info!(output_dir = %output_dir, "Output directory overridden from environment");
        config.output_dir = PathBuf::from(output_dir);
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
