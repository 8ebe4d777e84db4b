//! Helpers shared by the subcommands.

use anyhow::{Context, Result};
use colored::Colorize;

use super::CliConfig;
use crate::config::{ProjectConfig, VendorSettings};

/// Load `zint-vendor.toml` (if any) and resolve the effective settings.
pub async fn load_settings(config: &CliConfig) -> Result<VendorSettings> {
    let project = ProjectConfig::load(&config.project_dir, config.config_path.as_deref())
        .await
        .with_context(|| {
            format!("Failed to load configuration for {}", config.project_dir.display())
        })?;

    match &project.path {
        Some(path) => tracing::debug!("Using configuration from {}", path.display()),
        None => tracing::debug!("No zint-vendor.toml found, using defaults"),
    }

    Ok(VendorSettings::from_project(&project))
}

/// Print a green check line unless `--quiet` is set.
pub fn success(config: &CliConfig, message: &str) {
    if !config.quiet {
        println!("{} {}", "✓".green(), message);
    }
}
