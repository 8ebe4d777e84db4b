//! File system utilities used by the pipeline stages.
//!
//! All I/O functions are async (tokio) and report failures as
//! [`VendorError::Io`](crate::core::VendorError::Io) carrying the path and
//! operation.

pub mod atomic;
pub mod dirs;
pub mod paths;

pub use atomic::{atomic_write, safe_write};
pub use dirs::{ensure_dir, ensure_parent_dir, remove_dir_all};
pub use paths::{find_upwards, is_contained};
