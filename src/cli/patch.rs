//! Re-apply patch rules to an existing vendor tree.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::CliConfig;
use super::common::{load_settings, success};
use crate::core::{PipelineError, Stage};
use crate::patch::{DiskFs, apply_patches};

/// Apply the configured patch rules without re-downloading.
#[derive(Args)]
pub struct PatchCommand {}

impl PatchCommand {
    /// Apply every rule to the vendor directory.
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let settings = load_settings(config).await?;
        let report = apply_patches(&DiskFs, &settings.vendor_dir, &settings.rules)
            .await
            .map_err(|e| PipelineError::new(Stage::Patch, e))?;

        if !config.quiet {
            for file in &report.files {
                let status = if file.changed {
                    format!("{} replacements", file.replacements).normal()
                } else {
                    "unchanged".dimmed()
                };
                println!("  {} {}", file.path.display(), status);
            }
        }
        success(
            config,
            &format!("Applied {} replacements", report.total_replacements()),
        );
        Ok(())
    }
}
