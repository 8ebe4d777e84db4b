//! Vendor directory lifecycle.
//!
//! Every pipeline run starts from an empty vendor directory. Whatever a
//! previous run left behind (a complete tree, a half-extracted one, or a
//! partially patched one) is removed first. A stale tree that survived would
//! silently feed old sources to the native build, so failing to remove it is
//! fatal.

use crate::core::Result;
use crate::utils::fs::{ensure_dir, remove_dir_all};
use std::path::Path;
use tracing::{debug, info};

/// Remove `path` recursively (if present) and recreate it empty.
///
/// # Errors
///
/// [`VendorError::Io`](crate::core::VendorError::Io) if removal or creation
/// fails, e.g. because of permissions or files held open by another process.
pub async fn prepare_vendor_dir(path: &Path) -> Result<()> {
    if remove_dir_all(path).await? {
        info!("Removed previous vendor tree at {}", path.display());
    } else {
        debug!("No previous vendor tree at {}", path.display());
    }

    ensure_dir(path).await
}

/// Remove `path` recursively without recreating it.
///
/// Returns whether anything was removed.
pub async fn clean_vendor_dir(path: &Path) -> Result<bool> {
    let removed = remove_dir_all(path).await?;
    if removed {
        info!("Removed vendor tree at {}", path.display());
    }
    Ok(removed)
}
