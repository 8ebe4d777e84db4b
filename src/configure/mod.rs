//! Config header synthesis.
//!
//! zint's CMake build generates `backend/zintconfig.h` from the version
//! numbers declared in `CMakeLists.txt`. When the tree is compiled by another
//! build system that step never runs, so the header is derived here instead:
//! every `ZINT_VERSION_<NAME> <number>` occurrence in the build file becomes
//! one `#define` line, in source order.
//!
//! ```text
//! set(ZINT_VERSION_MAJOR 2)          #define ZINT_VERSION_MAJOR 2
//! set(ZINT_VERSION_MINOR 11)   ==>   #define ZINT_VERSION_MINOR 11
//! set(ZINT_VERSION_RELEASE 1)        #define ZINT_VERSION_RELEASE 1
//! ```
//!
//! Tokens are copied verbatim; the preprocessor does its own parsing. The
//! header is a pure function of the build file and is overwritten on every
//! run.

use crate::core::{IoResultExt, Result, VendorError};
use crate::utils::fs::safe_write;
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info};

static VERSION_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i-u:ZINT_VERSION_[A-Z]+)\s+[0-9]+").expect("version token pattern is valid")
});

/// A `NAME value` version definition found in the build file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionToken(String);

impl VersionToken {
    /// The matched text, exactly as it appears in the build file.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `#define` line for this token.
    pub fn to_define(&self) -> String {
        format!("#define {}", self.0)
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Find every version token in `source`, in order of appearance.
pub fn extract_version_tokens(source: &str) -> Vec<VersionToken> {
    VERSION_TOKEN.find_iter(source).map(|m| VersionToken(m.as_str().to_string())).collect()
}

/// Render the header: one `#define` per token, newline-separated, no
/// trailing newline.
pub fn render_header(tokens: &[VersionToken]) -> String {
    tokens.iter().map(VersionToken::to_define).collect::<Vec<_>>().join("\n")
}

/// Regenerate `header` from the tokens in `build_file`.
///
/// # Errors
///
/// - [`VendorError::Io`] if the build file cannot be read or the header
///   cannot be written
/// - [`VendorError::NoVersionTokensFound`] if the build file has no tokens,
///   which means upstream changed its format; the header is not touched
pub async fn synthesize_config(build_file: &Path, header: &Path) -> Result<Vec<VersionToken>> {
    let source = tokio::fs::read_to_string(build_file)
        .await
        .with_path("reading build description", build_file)?;

    let tokens = extract_version_tokens(&source);
    if tokens.is_empty() {
        return Err(VendorError::NoVersionTokensFound {
            path: build_file.to_path_buf(),
        });
    }

    for token in &tokens {
        debug!("Version token: {token}");
    }

    safe_write(header, &render_header(&tokens)).await?;

    info!("Wrote {} version definition(s) to {}", tokens.len(), header.display());
    Ok(tokens)
}
