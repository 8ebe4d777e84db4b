//! Command-line interface for zint-vendor
//!
//! # Commands
//!
//! - `install [--ref R]` - clear the vendor directory, download, extract,
//!   patch and configure zint
//! - `patch` - apply the patch rules to the existing vendor tree
//! - `configure` - regenerate `zintconfig.h` in the existing vendor tree
//! - `clean` - remove the vendor directory
//! - `resolve [--ref R]` - print the ref and archive URL `install` would use
//!
//! # Global Options
//!
//! - `--verbose` - enable debug logging
//! - `--quiet` - suppress everything except errors
//! - `--config PATH` - explicit `zint-vendor.toml` (also `ZINT_VENDOR_CONFIG`)
//! - `--project-dir DIR` - project root to search from (default: current directory)
//! - `--no-progress` - hide the download progress bar (also `ZINT_VENDOR_NO_PROGRESS`)
//!
//! # Examples
//!
//! ```bash
//! zint-vendor install                   # ref from zint-vendor.toml / package.json
//! zint-vendor install --ref 2.13.0      # explicit ref
//! zint-vendor --no-progress install     # CI-friendly output
//! zint-vendor configure                 # committed tree, header only
//! zint-vendor resolve                   # what would be fetched?
//! ```

mod clean;
mod common;
mod configure;
mod install;
mod patch;
mod resolve;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

pub use clean::CleanCommand;
pub use configure::ConfigureCommand;
pub use install::InstallCommand;
pub use patch::PatchCommand;
pub use resolve::ResolveCommand;

use crate::constants::CONFIG_PATH_ENV;

/// Settings derived from the global flags, passed to every command.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Log level filter; `None` disables logging
    pub log_level: Option<LevelFilter>,
    /// Suppress normal output
    pub quiet: bool,
    /// Hide progress bars
    pub no_progress: bool,
    /// Explicit configuration file
    pub config_path: Option<PathBuf>,
    /// Directory to search for configuration from
    pub project_dir: PathBuf,
}

impl CliConfig {
    /// Whether progress bars may be drawn.
    pub const fn show_progress(&self) -> bool {
        !self.no_progress && !self.quiet
    }
}

/// zint source vendoring tool.
#[derive(Parser)]
#[command(
    name = "zint-vendor",
    about = "Fetch, patch and configure a pinned zint source tree",
    version,
    long_about = "zint-vendor downloads a pinned zint release, unpacks it into a vendor \
                  directory, applies source patches and generates zintconfig.h so the \
                  library can be compiled without running CMake."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to zint-vendor.toml (default: searched upwards from the project directory)
    #[arg(short, long, global = true, env = CONFIG_PATH_ENV)]
    config: Option<PathBuf>,

    /// Project directory (default: current directory)
    #[arg(long, global = true)]
    project_dir: Option<PathBuf>,

    /// Disable the download progress bar
    #[arg(long, global = true)]
    no_progress: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Vendor zint from scratch: clear, fetch, extract, patch, configure
    Install(InstallCommand),

    /// Apply patch rules to the existing vendor tree
    Patch(PatchCommand),

    /// Regenerate the config header from the existing vendor tree
    Configure(ConfigureCommand),

    /// Remove the vendor directory
    Clean(CleanCommand),

    /// Print the ref and archive URL that install would use
    Resolve(ResolveCommand),
}

impl Cli {
    /// Install logging and run the selected command.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config()?;
        init_logging(config.log_level);
        self.execute_with_config(config).await
    }

    /// Translate the global flags into a [`CliConfig`].
    pub fn build_config(&self) -> Result<CliConfig> {
        let project_dir = match &self.project_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };

        let log_level = if self.verbose {
            Some(LevelFilter::DEBUG)
        } else if self.quiet {
            None
        } else {
            Some(LevelFilter::INFO)
        };

        Ok(CliConfig {
            log_level,
            quiet: self.quiet,
            no_progress: self.no_progress,
            config_path: self.config.clone(),
            project_dir,
        })
    }

    /// Run the selected command with an explicit configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Install(cmd) => cmd.execute(&config).await,
            Commands::Patch(cmd) => cmd.execute(&config).await,
            Commands::Configure(cmd) => cmd.execute(&config).await,
            Commands::Clean(cmd) => cmd.execute(&config).await,
            Commands::Resolve(cmd) => cmd.execute(&config).await,
        }
    }
}

/// Install the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over `level` when set.
fn init_logging(level: Option<LevelFilter>) {
    let Some(level) = level else {
        return;
    };

    let filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
