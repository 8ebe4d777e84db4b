//! Utility modules shared across the pipeline stages.
//!
//! - [`fs`] - async directory handling and atomic writes
//! - [`progress`] - download progress bars

pub mod fs;
pub mod progress;

pub use fs::{atomic_write, ensure_dir, remove_dir_all, safe_write};
pub use progress::ProgressBar;
