//! Regenerate the config header for a committed vendor tree.

use anyhow::Result;
use clap::Args;

use super::CliConfig;
use super::common::{load_settings, success};
use crate::configure::synthesize_config;
use crate::core::{PipelineError, Stage};

/// Write the config header from the build file's version definitions.
#[derive(Args)]
pub struct ConfigureCommand {}

impl ConfigureCommand {
    /// Scan the build file and write the header.
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let settings = load_settings(config).await?;
        let tokens = synthesize_config(&settings.build_file, &settings.config_header)
            .await
            .map_err(|e| PipelineError::new(Stage::Configure, e))?;

        success(
            config,
            &format!(
                "Wrote {} ({} version definitions)",
                settings.config_header.display(),
                tokens.len()
            ),
        );
        Ok(())
    }
}
