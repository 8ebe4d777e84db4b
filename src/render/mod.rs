//! Rendering facade contract.
//!
//! Barcode encoding and rasterisation belong to the vendored native library.
//! This module only fixes the boundary a binding to that library implements:
//! the configuration it accepts ([`SymbologyConfig`]), what it returns
//! ([`SymbologyResult`]), and its error type ([`RenderError`]), which is
//! kept separate from the vendoring pipeline's errors.

mod config;
mod options;

pub use config::SymbologyConfig;
pub use options::{Barcode, DataMatrix, Encoding, EncodingMode, Output, OutputOption, OutputType, SymbologyType};

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by a [`Renderer`].
#[derive(Error, Debug)]
pub enum RenderError {
    /// An option has a value the library cannot use.
    #[error("Invalid option `{option}`: {reason}")]
    InvalidOption {
        /// Option name as written in the configuration
        option: String,
        /// Why it was rejected
        reason: String,
    },

    /// File rendering was requested without `fileName`.
    #[error("`fileName` is required to render to a file")]
    MissingFileName,

    /// The file name's extension names no supported format.
    #[error("Cannot infer output format from {}: expected .png, .eps or .svg", .path.display())]
    UnsupportedExtension {
        /// The requested output path
        path: PathBuf,
    },

    /// The native library reported an error.
    #[error("zint error {code}: {message}")]
    Native {
        /// zint return code (`ZINT_ERROR_*`)
        code: i32,
        /// Library error text
        message: String,
    },

    /// Writing the output file failed.
    #[error("Failed to write {}", .path.display())]
    Io {
        /// Output path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    /// Build an [`RenderError::InvalidOption`].
    pub fn invalid(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }
}

/// A rendered symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbologyResult {
    /// zint return code; 0 is success, values below 5 are warnings
    pub code: i32,
    /// Warning or status text from the library
    pub message: String,
    /// SVG or EPS text, or base64-encoded PNG
    pub encoded_data: String,
    /// Rendered width in pixels
    pub width: u32,
    /// Rendered height in pixels
    pub height: u32,
}

impl SymbologyResult {
    /// Whether the library reported a warning rather than clean success.
    pub const fn is_warning(&self) -> bool {
        self.code > 0 && self.code < 5
    }
}

/// Async entry points of a binding to the native library.
pub trait Renderer {
    /// Render `data` and return the image in memory.
    fn create_stream(
        &self,
        config: &SymbologyConfig,
        data: &str,
        output: OutputType,
    ) -> impl Future<Output = Result<SymbologyResult, RenderError>> + Send;

    /// Render `data` to `config.file_name`, format taken from its extension.
    fn create_file(
        &self,
        config: &SymbologyConfig,
        data: &str,
    ) -> impl Future<Output = Result<SymbologyResult, RenderError>> + Send;
}

/// Output path and format for a file render.
///
/// # Errors
///
/// [`RenderError::MissingFileName`] or [`RenderError::UnsupportedExtension`].
pub fn file_target(config: &SymbologyConfig) -> Result<(PathBuf, OutputType), RenderError> {
    let name = config
        .file_name
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .ok_or(RenderError::MissingFileName)?;
    let path = Path::new(name);
    let output = OutputType::from_path(path).ok_or_else(|| RenderError::UnsupportedExtension {
        path: path.to_path_buf(),
    })?;
    Ok((path.to_path_buf(), output))
}
