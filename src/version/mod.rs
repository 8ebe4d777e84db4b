//! Version resolution: which zint ref to fetch.
//!
//! The ref comes from one of several places, checked in priority order:
//!
//! 1. an explicit override (`zint-vendor install --ref v2.12.0`)
//! 2. `version` in `zint-vendor.toml`
//! 3. `zintVersion` in the wrapper project's `package.json`
//! 4. [`DEFAULT_REF`](crate::constants::DEFAULT_REF)
//!
//! Blank values (empty or whitespace-only) count as unset and fall through to
//! the next source. Resolution itself never fails.

use crate::constants::{DEFAULT_REF, PACKAGE_JSON_VERSION_KEY};
use crate::core::{Result, VendorError};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Return `version` when it is non-blank, otherwise the default branch.
///
/// # Examples
///
/// ```rust
/// use zint_vendor::version::resolve_ref;
///
/// assert_eq!(resolve_ref(Some("2.12.0")), "2.12.0");
/// assert_eq!(resolve_ref(Some("")), "master");
/// assert_eq!(resolve_ref(None), "master");
/// ```
pub fn resolve_ref(version: Option<&str>) -> String {
    non_blank(version).unwrap_or(DEFAULT_REF).to_string()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Where a resolved ref came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefOrigin {
    /// Command-line override
    Override,
    /// `version` in `zint-vendor.toml`
    ConfigFile,
    /// `zintVersion` in `package.json`
    PackageJson,
    /// Nothing pinned; default branch
    Default,
}

impl fmt::Display for RefOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Override => "command line",
            Self::ConfigFile => "zint-vendor.toml",
            Self::PackageJson => "package.json",
            Self::Default => "default branch",
        })
    }
}

/// A resolved ref together with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRef {
    /// The ref to fetch; never empty
    pub name: String,
    /// Which source supplied it
    pub origin: RefOrigin,
}

/// Candidate refs from every source.
#[derive(Debug, Clone, Default)]
pub struct RefSources {
    /// Explicit override from the command line
    pub cli: Option<String>,
    /// `version` from the project config file
    pub config: Option<String>,
    /// `zintVersion` from `package.json`
    pub package_json: Option<String>,
}

impl RefSources {
    /// Pick the highest-priority non-blank candidate.
    pub fn resolve(&self) -> ResolvedRef {
        let candidates = [
            (self.cli.as_deref(), RefOrigin::Override),
            (self.config.as_deref(), RefOrigin::ConfigFile),
            (self.package_json.as_deref(), RefOrigin::PackageJson),
        ];

        let resolved = candidates
            .into_iter()
            .find_map(|(value, origin)| {
                non_blank(value).map(|name| ResolvedRef {
                    name: name.to_string(),
                    origin,
                })
            })
            .unwrap_or_else(|| ResolvedRef {
                name: resolve_ref(None),
                origin: RefOrigin::Default,
            });

        debug!("Resolved zint ref '{}' from {}", resolved.name, resolved.origin);
        resolved
    }
}

/// Read the pinned zint ref from a wrapper project's `package.json`.
///
/// A missing file or missing key yields `Ok(None)`. Invalid JSON, or a
/// `zintVersion` that is not a string, is a [`VendorError::Config`].
pub async fn read_package_json_version(path: &Path) -> Result<Option<String>> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(VendorError::io("reading", path, e)),
    };

    let value: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| VendorError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    match value.get(PACKAGE_JSON_VERSION_KEY) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(version)) => Ok(Some(version.clone())),
        Some(other) => Err(VendorError::Config {
            path: path.to_path_buf(),
            message: format!("`{PACKAGE_JSON_VERSION_KEY}` must be a string, found {other}"),
        }),
    }
}
