//! Vendor zint from scratch.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::CliConfig;
use super::common::load_settings;
use crate::fetch::HttpArchiveSource;
use crate::pipeline::VendorPipeline;

/// Clear the vendor directory, then fetch, extract, patch and configure zint.
#[derive(Args)]
pub struct InstallCommand {
    /// Branch or tag to vendor, overriding zint-vendor.toml and package.json
    #[arg(long = "ref", value_name = "REF")]
    git_ref: Option<String>,
}

impl InstallCommand {
    /// Run the full pipeline.
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let settings = load_settings(config).await?;
        let resolved = settings.resolve_ref(self.git_ref.as_deref()).await?;
        tracing::debug!("Resolved ref {} from {}", resolved.name, resolved.origin);

        let source = HttpArchiveSource::new(config.show_progress())?;
        let pipeline = VendorPipeline::new(settings, source);
        let report = pipeline.run(&resolved.name).await?;

        if config.quiet {
            return Ok(());
        }

        let vendor_dir = &pipeline.settings().vendor_dir;
        println!("{} Downloaded {}", "✓".green(), report.url);
        println!("  {}", report.sha256.dimmed());
        println!(
            "{} Extracted {} files ({}) into {}",
            "✓".green(),
            report.extract.files,
            report.extract.format,
            vendor_dir.display()
        );
        println!(
            "{} Applied {} replacements across {} files",
            "✓".green(),
            report.patches.total_replacements(),
            report.patches.files.len()
        );
        println!(
            "{} Wrote {} ({} version definitions)",
            "✓".green(),
            pipeline.settings().config_header.display(),
            report.tokens.len()
        );
        println!(
            "\n{} zint {} vendored in {:.1}s",
            "Installation complete!".green().bold(),
            report.git_ref.cyan(),
            report.elapsed.as_secs_f64()
        );
        Ok(())
    }
}
