//! zint-vendor CLI entry point
//!
//! Parses arguments, runs the selected command, and prints failures with
//! their stage, details and a suggestion before exiting non-zero.

use anyhow::Result;
use clap::Parser;
use zint_vendor::cli;
use zint_vendor::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
