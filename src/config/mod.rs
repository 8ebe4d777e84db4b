//! Project configuration for zint-vendor
//!
//! Projects describe how zint is vendored in an optional `zint-vendor.toml`.
//! Every key is optional; a project without the file gets the defaults from
//! [`constants`](crate::constants).
//!
//! ```toml
//! # Ref to fetch (branch or tag). Overridden by `install --ref`.
//! version = "2.13.0"
//!
//! # Where the tree is unpacked, relative to this file
//! vendor_dir = ".zint"
//!
//! # `{ref}` is replaced with the resolved version
//! archive_url = "https://github.com/zint/zint/archive/{ref}.tar.gz"
//!
//! # Optional pin of the downloaded archive
//! sha256 = "sha256:9a2b..."
//!
//! # Relative to the vendor root
//! build_file = "CMakeLists.txt"
//! config_header = "backend/zintconfig.h"
//!
//! # Replaces the built-in patch set when present
//! [[patch]]
//! file = "backend/library.c"
//!
//! [[patch.replace]]
//! find = "f = stdout;"
//! with = "f = stderr;"
//! ```
//!
//! # Locating the file
//!
//! 1. `--config PATH` (or `ZINT_VENDOR_CONFIG`), which must exist
//! 2. the first `zint-vendor.toml` found walking up from the project directory
//! 3. none: defaults, rooted at the project directory
//!
//! Relative paths in the file are resolved against the directory containing
//! it. [`VendorSettings`] holds the result with every path made absolute.

mod settings;

pub use settings::VendorSettings;

use crate::constants::CONFIG_FILE_NAME;
use crate::core::{IoResultExt, Result, VendorError};
use crate::fetch::ChecksumVerifier;
use crate::patch::PatchRule;
use crate::utils::fs::{find_upwards, is_contained};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Contents of `zint-vendor.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VendorConfig {
    /// Pinned zint ref
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Vendor directory, relative to the config file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_dir: Option<PathBuf>,

    /// Archive URL template containing `{ref}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_url: Option<String>,

    /// Expected archive digest (`sha256:<hex>` or bare hex)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,

    /// Build description, relative to the vendor root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_file: Option<PathBuf>,

    /// Generated header, relative to the vendor root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_header: Option<PathBuf>,

    /// Patch rules replacing the built-in set
    #[serde(default, rename = "patch", skip_serializing_if = "Option::is_none")]
    pub patches: Option<Vec<PatchRule>>,
}

impl VendorConfig {
    /// Parse and validate TOML `content`; `path` is used in error messages.
    ///
    /// # Errors
    ///
    /// [`VendorError::Config`] for TOML syntax errors, unknown keys, or
    /// values that fail [`validate`](Self::validate).
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| VendorError::Config {
            path: path.to_path_buf(),
            message: e.to_string().trim_end().to_string(),
        })?;
        config.validate(path)?;
        Ok(config)
    }

    /// Read and parse the file at `path`.
    ///
    /// # Errors
    ///
    /// [`VendorError::Io`] if the file cannot be read, otherwise as
    /// [`parse`](Self::parse).
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await.with_path("reading config", path)?;
        Self::parse(&content, path)
    }

    /// Check values that TOML typing alone cannot.
    ///
    /// - paths stay inside their base directory
    /// - `archive_url` is non-blank
    /// - `sha256` is a well-formed digest
    /// - every patch rule has at least one replacement
    pub fn validate(&self, path: &Path) -> Result<()> {
        let invalid = |message: String| {
            Err(VendorError::Config {
                path: path.to_path_buf(),
                message,
            })
        };

        if let Some(url) = &self.archive_url {
            if url.trim().is_empty() {
                return invalid("`archive_url` must not be empty".to_string());
            }
        }

        if let Some(digest) = &self.sha256 {
            if !ChecksumVerifier::is_well_formed(digest) {
                return invalid(format!("`sha256` is not a SHA-256 digest: {digest}"));
            }
        }

        for (key, value) in [
            ("vendor_dir", &self.vendor_dir),
            ("build_file", &self.build_file),
            ("config_header", &self.config_header),
        ] {
            if let Some(value) = value {
                if !is_contained(value) {
                    return invalid(format!(
                        "`{key}` must be a relative path without `..`: {}",
                        value.display()
                    ));
                }
            }
        }

        for rule in self.patches.iter().flatten() {
            if !rule.is_contained() {
                return invalid(format!(
                    "patch target must be a relative path without `..`: {}",
                    rule.file.display()
                ));
            }
            if rule.replacements.is_empty() {
                return invalid(format!("patch for {} has no replacements", rule.file.display()));
            }
        }

        Ok(())
    }
}

/// A loaded configuration and where it came from.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    /// Parsed configuration (defaults when no file was found)
    pub config: VendorConfig,
    /// The file that was loaded, if any
    pub path: Option<PathBuf>,
    /// Directory relative paths are resolved against
    pub root: PathBuf,
}

impl ProjectConfig {
    /// Locate and load the project configuration.
    ///
    /// `explicit` comes from `--config` / `ZINT_VENDOR_CONFIG` and must exist.
    /// Otherwise `zint-vendor.toml` is searched for upwards from
    /// `project_dir`; when none is found, defaults are used.
    pub async fn load(project_dir: &Path, explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(project_dir.join(path)),
            None => find_upwards(project_dir, CONFIG_FILE_NAME),
        };

        let Some(path) = path else {
            debug!("No {CONFIG_FILE_NAME} found from {}; using defaults", project_dir.display());
            return Ok(Self {
                config: VendorConfig::default(),
                path: None,
                root: project_dir.to_path_buf(),
            });
        };

        debug!("Loading configuration from {}", path.display());
        let config = VendorConfig::load_from(&path).await?;
        let root = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => project_dir.to_path_buf(),
        };

        Ok(Self {
            config,
            path: Some(path),
            root,
        })
    }
}
