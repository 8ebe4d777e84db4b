//! Remove the vendor directory.

use anyhow::Result;
use clap::Args;

use super::CliConfig;
use super::common::{load_settings, success};
use crate::core::{PipelineError, Stage};
use crate::vendor_dir::clean_vendor_dir;

/// Delete the vendored tree.
#[derive(Args)]
pub struct CleanCommand {}

impl CleanCommand {
    /// Remove the vendor directory if it exists.
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let settings = load_settings(config).await?;
        let removed = clean_vendor_dir(&settings.vendor_dir)
            .await
            .map_err(|e| PipelineError::new(Stage::Prepare, e))?;

        let message = if removed {
            format!("Removed {}", settings.vendor_dir.display())
        } else {
            format!("{} does not exist", settings.vendor_dir.display())
        };
        success(config, &message);
        Ok(())
    }
}
