//! Directory operations for creating and removing directories.

use crate::core::{IoResultExt, Result};
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

/// Ensures a directory exists, creating it and all parent directories if necessary.
///
/// # Returns
///
/// - `Ok(())` if the directory exists or was successfully created
/// - `Err` if the path exists but is not a directory, or creation fails
///
/// # Examples
///
/// ```rust,no_run
/// use zint_vendor::utils::fs::ensure_dir;
/// use std::path::Path;
///
/// # async fn example() -> zint_vendor::core::Result<()> {
/// ensure_dir(Path::new(".zint/backend")).await?;
/// # Ok(())
/// # }
/// ```
pub async fn ensure_dir(path: &Path) -> Result<()> {
    match fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(std::io::Error::new(
            ErrorKind::AlreadyExists,
            "path exists but is not a directory",
        ))
        .with_path("creating directory", path),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            fs::create_dir_all(path).await.with_path("creating directory", path)
        }
        Err(e) => Err(e).with_path("inspecting", path),
    }
}

/// Ensures that the parent directory of a file path exists.
///
/// Paths without a parent (e.g. `file.txt`) are left alone.
pub async fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent).await,
        _ => Ok(()),
    }
}

/// Recursively removes a directory and all its contents.
///
/// A missing directory is not an error. Symlinks are removed, not followed.
///
/// # Returns
///
/// `true` if something was removed, `false` if the path did not exist.
pub async fn remove_dir_all(path: &Path) -> Result<bool> {
    let meta = match fs::symlink_metadata(path).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e).with_path("inspecting", path),
    };

    let removed = if meta.is_dir() {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_file(path).await
    };

    match removed {
        Ok(()) => Ok(true),
        // Raced with another remover; the end state is what we wanted.
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_path("removing", path),
    }
}
