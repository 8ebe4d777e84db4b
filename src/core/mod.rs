//! Core types shared by every pipeline stage.
//!
//! This module holds the error taxonomy ([`VendorError`]), the stage tag used
//! in user-facing messages ([`Stage`], [`PipelineError`]), and the helpers that
//! turn any error into colored CLI output ([`ErrorContext`],
//! [`user_friendly_error`]).

pub mod error;

pub use error::{
    ErrorContext, IoResultExt, PipelineError, Stage, VendorError, user_friendly_error,
};

/// Result alias for stage functions.
pub type Result<T, E = VendorError> = std::result::Result<T, E>;
