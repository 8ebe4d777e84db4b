//! zint-vendor - fetch, patch and configure a pinned zint source tree
//!
//! Native bindings to the zint barcode library compile its C sources
//! directly instead of running CMake. This crate prepares those sources: it
//! downloads a pinned release archive, unpacks it into a vendor directory,
//! applies a small set of source patches and writes the `zintconfig.h`
//! header CMake would normally generate.
//!
//! # Pipeline
//!
//! ```text
//! prepare ──► fetch ──► extract ──► patch ──► configure
//! ```
//!
//! Each stage is a plain async function and can be driven on its own; the
//! [`pipeline::VendorPipeline`] runs them in order and tags the first failure
//! with its [`core::Stage`].
//!
//! # Core Modules
//!
//! - [`cli`] - `zint-vendor` subcommands
//! - [`config`] - `zint-vendor.toml` loading and effective settings
//! - [`core`] - error types and user-facing error display
//! - [`pipeline`] - the staged vendoring run
//!
//! ## Stages
//! - [`vendor_dir`] - clearing and recreating the vendor directory
//! - [`fetch`] - archive URL construction, download and checksum pinning
//! - [`extract`] - gzip/tar unpacking with root-directory stripping
//! - [`patch`] - find/replace rules over vendored sources
//! - [`configure`] - `ZINT_VERSION_*` extraction and header generation
//!
//! ## Supporting Modules
//! - [`version`] - which ref to fetch
//! - [`render`] - types shared with the rendering binding
//! - [`utils`] - atomic writes, directory helpers, progress bars
//!
//! # Configuration (zint-vendor.toml)
//!
//! ```toml
//! version = "2.13.0"
//! vendor_dir = ".zint"
//! sha256 = "sha256:<hex>"
//!
//! [[patch]]
//! file = "backend/library.c"
//!
//! [[patch.replace]]
//! find = "f = stdout;"
//! with = "f = stderr;"
//! ```
//!
//! Every key is optional. Without a file the defaults vendor `master` into
//! `.zint/` with the built-in patch rules.
//!
//! # Example
//!
//! ```rust,no_run
//! use zint_vendor::config::VendorSettings;
//! use zint_vendor::fetch::HttpArchiveSource;
//! use zint_vendor::pipeline::VendorPipeline;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let settings = VendorSettings::new(".");
//! let pipeline = VendorPipeline::new(settings, HttpArchiveSource::new(true)?);
//! let report = pipeline.run("2.13.0").await?;
//! println!("vendored {} files", report.extract.files);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod configure;
pub mod constants;
pub mod core;
pub mod extract;
pub mod fetch;
pub mod patch;
pub mod pipeline;
pub mod render;
pub mod utils;
pub mod vendor_dir;
pub mod version;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
