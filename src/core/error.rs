//! Error handling for zint-vendor
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** for each pipeline stage, so callers (and tests)
//!    can match on the exact failure mode
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`VendorError`] - every failure a pipeline stage can produce
//! - [`Stage`] - the pipeline stage a failure happened in
//! - [`PipelineError`] - a [`VendorError`] tagged with its [`Stage`]
//! - [`ErrorContext`] - message plus optional details and suggestion for display
//!
//! Library code returns [`VendorError`]; the CLI works with [`anyhow::Error`]
//! and converts it with [`user_friendly_error`] right before exiting.
//!
//! # Examples
//!
//! ```rust,no_run
//! use zint_vendor::core::{PipelineError, Stage, VendorError, user_friendly_error};
//!
//! let err = PipelineError::new(
//!     Stage::Configure,
//!     VendorError::NoVersionTokensFound { path: "CMakeLists.txt".into() },
//! );
//! let ctx = user_friendly_error(anyhow::Error::from(err));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A stage of the vendoring pipeline.
///
/// Stages run strictly in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Clearing and recreating the vendor directory
    Prepare,
    /// Downloading the source archive
    Fetch,
    /// Unpacking the archive into the vendor directory
    Extract,
    /// Applying source patches
    Patch,
    /// Generating the config header
    Configure,
}

impl Stage {
    /// Lowercase stage name as shown to users.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Prepare => "prepare",
            Self::Fetch => "fetch",
            Self::Extract => "extract",
            Self::Patch => "patch",
            Self::Configure => "configure",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The error type for all vendoring stages.
///
/// # Error Categories
///
/// ## Fetch
/// - [`Network`](Self::Network) - transport failure (DNS, TLS, connect, read)
/// - [`HttpStatus`](Self::HttpStatus) - server answered with a non-success status
/// - [`EmptyBody`](Self::EmptyBody) - server answered with no content
/// - [`ChecksumMismatch`](Self::ChecksumMismatch) - archive digest differs from the pin
///
/// ## Extraction and file system (shared across stages)
/// - [`ArchiveCorrupt`](Self::ArchiveCorrupt) - not a readable gzip/tar stream
/// - [`StreamTruncated`](Self::StreamTruncated) - input ended early
/// - [`Io`](Self::Io) - file system operation failed
///
/// ## Patch
/// - [`PatchTargetNotFound`](Self::PatchTargetNotFound) - rule names a missing file
/// - [`PatchNotApplied`](Self::PatchNotApplied) - required pattern matched nothing
/// - [`InvalidPatchPattern`](Self::InvalidPatchPattern) - empty pattern or bad regex
///
/// ## Configure
/// - [`NoVersionTokensFound`](Self::NoVersionTokensFound) - build file has no version tokens
///
/// ## Settings
/// - [`Config`](Self::Config) - project configuration could not be loaded
#[derive(Error, Debug)]
pub enum VendorError {
    /// Transport-level failure talking to the archive host.
    #[error("Network error while fetching {url}")]
    Network {
        /// The URL being fetched
        url: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// The archive host answered with a non-success HTTP status.
    #[error("HTTP {status} while fetching {url}")]
    HttpStatus {
        /// The URL being fetched
        url: String,
        /// Numeric HTTP status code
        status: u16,
    },

    /// The archive host answered successfully but sent no content.
    #[error("Empty response body from {url}")]
    EmptyBody {
        /// The URL being fetched
        url: String,
    },

    /// Downloaded archive does not match the pinned digest.
    #[error("Checksum mismatch for {url}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// The URL the archive came from
        url: String,
        /// Digest from configuration
        expected: String,
        /// Digest of the received bytes
        actual: String,
    },

    /// The archive could not be decoded as gzip or tar.
    #[error("Archive is corrupt: {reason}")]
    ArchiveCorrupt {
        /// What was wrong with the data
        reason: String,
    },

    /// The byte stream ended before the archive or body was complete.
    #[error("Stream ended early: {reason}")]
    StreamTruncated {
        /// Where the stream stopped
        reason: String,
    },

    /// A file system operation failed.
    #[error("I/O error while {operation} {}", .path.display())]
    Io {
        /// What was being done (e.g. "reading", "removing directory")
        operation: String,
        /// The path involved
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A patch rule names a file that does not exist in the vendor tree.
    #[error("Patch target not found: {}", .path.display())]
    PatchTargetNotFound {
        /// Target path relative to the vendor root
        path: PathBuf,
    },

    /// A required patch pattern matched nothing in its target file.
    #[error("Patch not applied to {}: pattern {pattern:?} matched nothing", .path.display())]
    PatchNotApplied {
        /// Target path relative to the vendor root
        path: PathBuf,
        /// The pattern that found no match
        pattern: String,
    },

    /// A patch pattern is unusable (empty, or a regex that fails to compile).
    #[error("Invalid patch pattern {pattern:?} for {}: {reason}", .path.display())]
    InvalidPatchPattern {
        /// Target path relative to the vendor root
        path: PathBuf,
        /// The offending pattern
        pattern: String,
        /// Why it was rejected
        reason: String,
    },

    /// The build-description file contains no `ZINT_VERSION_*` tokens.
    #[error("No version tokens found in {}", .path.display())]
    NoVersionTokensFound {
        /// The build-description file that was scanned
        path: PathBuf,
    },

    /// Project configuration could not be loaded.
    #[error("Configuration error in {}: {message}", .path.display())]
    Config {
        /// The configuration file
        path: PathBuf,
        /// What went wrong
        message: String,
    },
}

impl VendorError {
    /// Build an [`VendorError::Io`] for `operation` on `path`.
    pub fn io(operation: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Classify an I/O error raised while decoding an archive stream.
    ///
    /// `flate2` reports premature end of input as `UnexpectedEof` and bad data
    /// as `InvalidInput`/`InvalidData`. `tar` reports its own format problems
    /// with `ErrorKind::Other`, using "EOF"/"entire block" wording when the
    /// input stops mid-entry. Any other kind is a file system failure while
    /// writing into `dest`.
    pub fn from_archive_io(err: std::io::Error, dest: &Path) -> Self {
        use std::io::ErrorKind;

        match err.kind() {
            ErrorKind::UnexpectedEof => Self::StreamTruncated {
                reason: err.to_string(),
            },
            ErrorKind::InvalidData | ErrorKind::InvalidInput => Self::ArchiveCorrupt {
                reason: err.to_string(),
            },
            ErrorKind::Other => {
                let reason = err.to_string();
                if reason.contains("EOF") || reason.contains("entire block") {
                    Self::StreamTruncated {
                        reason,
                    }
                } else {
                    Self::ArchiveCorrupt {
                        reason,
                    }
                }
            }
            _ => Self::io("unpacking archive into", dest, err),
        }
    }
}

/// Extension trait attaching operation and path context to I/O results.
pub trait IoResultExt<T> {
    /// Map an [`std::io::Error`] into [`VendorError::Io`].
    fn with_path(self, operation: &str, path: &Path) -> Result<T, VendorError>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, operation: &str, path: &Path) -> Result<T, VendorError> {
        self.map_err(|e| VendorError::io(operation, path, e))
    }
}

/// A stage failure, carrying the stage name for the user-facing message.
#[derive(Error, Debug)]
#[error("{stage} stage failed: {source}")]
pub struct PipelineError {
    /// The stage that failed
    pub stage: Stage,
    /// The underlying failure
    #[source]
    pub source: VendorError,
}

impl PipelineError {
    /// Tag `source` with `stage`.
    pub const fn new(stage: Stage, source: VendorError) -> Self {
        Self {
            stage,
            source,
        }
    }
}

/// Error message with optional details and suggestion for terminal display.
#[derive(Debug)]
pub struct ErrorContext {
    /// The primary error message
    pub message: String,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a context with only a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with terminal colors.
    ///
    /// - Error message: red and bold
    /// - Details: yellow
    /// - Suggestion: green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into a user-friendly [`ErrorContext`].
///
/// Recognizes [`PipelineError`] and bare [`VendorError`] values anywhere in
/// the chain and attaches a stage-specific suggestion. Everything else is
/// rendered with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let message = render_chain(&error);

    for cause in error.chain() {
        if let Some(pipeline) = cause.downcast_ref::<PipelineError>() {
            return attach_hints(ErrorContext::new(message), &pipeline.source);
        }
        if let Some(vendor) = cause.downcast_ref::<VendorError>() {
            return attach_hints(ErrorContext::new(message), vendor);
        }
    }

    ErrorContext::new(message)
}

fn render_chain(error: &anyhow::Error) -> String {
    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    message
}

fn attach_hints(ctx: ErrorContext, error: &VendorError) -> ErrorContext {
    match error {
        VendorError::Network { .. } => ctx
            .with_suggestion("Check your network connection and proxy settings, then run the install again")
            .with_details("The archive host could not be reached or the transfer was interrupted"),
        VendorError::HttpStatus { status: 404, .. } => ctx
            .with_suggestion("Check that the pinned version names a published zint branch or tag")
            .with_details("The archive URL is built from the pinned version; a 404 usually means the ref does not exist"),
        VendorError::HttpStatus { .. } | VendorError::EmptyBody { .. } => ctx
            .with_suggestion("Retry later, or point `archive_url` at a mirror in zint-vendor.toml"),
        VendorError::ChecksumMismatch { .. } => ctx
            .with_suggestion("Update `sha256` in zint-vendor.toml if the pinned version changed on purpose")
            .with_details("The downloaded archive differs from the one the checksum was recorded for"),
        VendorError::ArchiveCorrupt { .. } | VendorError::StreamTruncated { .. } => ctx
            .with_suggestion("Run the install again; if it keeps failing, verify the archive URL serves a .tar.gz"),
        VendorError::Io { .. } => ctx
            .with_suggestion("Check file permissions and that no other process holds files in the vendor directory"),
        VendorError::PatchTargetNotFound { .. } | VendorError::PatchNotApplied { .. } => ctx
            .with_suggestion("The upstream source has drifted: update the patch rules or pin an older version")
            .with_details("Patch rules are written against a specific zint layout and stop matching when upstream changes"),
        VendorError::InvalidPatchPattern { .. } => ctx
            .with_suggestion("Fix the regex in the [[patch]] table, or set `regex = false` for literal text"),
        VendorError::NoVersionTokensFound { .. } => ctx
            .with_suggestion("The upstream build file format changed; check where ZINT_VERSION_* values are defined")
            .with_details("Expected lines such as `set(ZINT_VERSION_MAJOR 2)`"),
        VendorError::Config { .. } => ctx
            .with_suggestion("Check the TOML syntax in zint-vendor.toml. Verify quotes, brackets, and field names"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Prepare.to_string(), "prepare");
        assert_eq!(Stage::Configure.to_string(), "configure");
    }

    #[test]
    fn test_pipeline_error_names_stage_and_cause() {
        let err = PipelineError::new(
            Stage::Patch,
            VendorError::PatchTargetNotFound {
                path: PathBuf::from("backend/library.c"),
            },
        );
        assert_eq!(err.to_string(), "patch stage failed: Patch target not found: backend/library.c");
    }

    #[test]
    fn test_archive_io_classification() {
        let dest = Path::new("/tmp/out");

        let truncated = VendorError::from_archive_io(io::Error::from(io::ErrorKind::UnexpectedEof), dest);
        assert!(matches!(truncated, VendorError::StreamTruncated { .. }));

        let corrupt = VendorError::from_archive_io(
            io::Error::new(io::ErrorKind::InvalidInput, "invalid gzip header"),
            dest,
        );
        assert!(matches!(corrupt, VendorError::ArchiveCorrupt { .. }));

        let short_block =
            VendorError::from_archive_io(io::Error::other("failed to read entire block"), dest);
        assert!(matches!(short_block, VendorError::StreamTruncated { .. }));

        let bad_header =
            VendorError::from_archive_io(io::Error::other("archive header checksum mismatch"), dest);
        assert!(matches!(bad_header, VendorError::ArchiveCorrupt { .. }));

        let denied = VendorError::from_archive_io(io::Error::from(io::ErrorKind::PermissionDenied), dest);
        assert!(matches!(denied, VendorError::Io { .. }));
    }

    #[test]
    fn test_with_path_maps_io_error() {
        let result: io::Result<()> = Err(io::Error::from(io::ErrorKind::NotFound));
        let err = result.with_path("reading", Path::new("CMakeLists.txt")).unwrap_err();
        assert_eq!(err.to_string(), "I/O error while reading CMakeLists.txt");
    }

    #[test]
    fn test_user_friendly_error_attaches_drift_suggestion() {
        let err = PipelineError::new(
            Stage::Patch,
            VendorError::PatchNotApplied {
                path: PathBuf::from("backend/library.c"),
                pattern: "f = stdout;".to_string(),
            },
        );
        let ctx = user_friendly_error(anyhow::Error::from(err));
        assert!(ctx.message.starts_with("patch stage failed"));
        assert!(ctx.suggestion.as_deref().unwrap().contains("drifted"));
    }

    #[test]
    fn test_user_friendly_error_finds_error_behind_context() {
        use anyhow::Context;

        let result: Result<(), VendorError> = Err(VendorError::NoVersionTokensFound {
            path: PathBuf::from("CMakeLists.txt"),
        });
        let err = result.context("Failed to regenerate config header").unwrap_err();
        let ctx = user_friendly_error(err);

        assert!(ctx.message.contains("Caused by:"));
        assert!(ctx.details.as_deref().unwrap().contains("ZINT_VERSION_MAJOR"));
    }

    #[test]
    fn test_generic_error_has_no_suggestion() {
        let ctx = user_friendly_error(anyhow::anyhow!("something else"));
        assert_eq!(ctx.message, "something else");
        assert!(ctx.suggestion.is_none());
    }
}
