//! Integration test suite for zint-vendor
//!
//! End-to-end tests that drive the library pipeline and the `zint-vendor`
//! binary against in-memory archives and a local HTTP server. Nothing here
//! touches the real network.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **pipeline**: full runs compared against golden output files
//! - **cli**: subcommand behavior, output and exit codes

mod common;

mod cli;
mod pipeline;
