//! Show what `install` would fetch.

use anyhow::Result;
use clap::Args;

use super::CliConfig;
use super::common::load_settings;
use crate::fetch::archive_url;

/// Print the resolved ref, where it came from, and the archive URL.
#[derive(Args)]
pub struct ResolveCommand {
    /// Branch or tag override, as for `install --ref`
    #[arg(long = "ref", value_name = "REF")]
    git_ref: Option<String>,
}

impl ResolveCommand {
    /// Resolve without touching the network or the vendor directory.
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let settings = load_settings(config).await?;
        let resolved = settings.resolve_ref(self.git_ref.as_deref()).await?;

        println!("ref:    {}", resolved.name);
        println!("origin: {}", resolved.origin);
        println!("url:    {}", archive_url(&settings.archive_url, &resolved.name));
        println!("vendor: {}", settings.vendor_dir.display());
        Ok(())
    }
}
