//! Atomic file write operations using temp-and-rename strategy.
//!
//! Readers of a file written here see either the old content or the new
//! content, never a partial write.

use crate::core::{IoResultExt, Result};
use crate::utils::fs::dirs::ensure_parent_dir;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Atomically writes bytes to a file.
///
/// 1. Writes content to a sibling temporary file (`<name>.tmp`)
/// 2. Syncs the temporary file to disk
/// 3. Renames the temporary file over the target path
///
/// Parent directories are created if they don't exist.
///
/// # Examples
///
/// ```rust,no_run
/// use zint_vendor::utils::fs::atomic_write;
/// use std::path::Path;
///
/// # async fn example() -> zint_vendor::core::Result<()> {
/// atomic_write(Path::new(".zint/backend/zintconfig.h"), b"#define ZINT_VERSION_MAJOR 2").await?;
/// # Ok(())
/// # }
/// ```
pub async fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    ensure_parent_dir(path).await?;

    let temp_path = temp_path_for(path);

    {
        let mut file = fs::File::create(&temp_path).await.with_path("creating", &temp_path)?;
        file.write_all(content).await.with_path("writing", &temp_path)?;
        file.sync_all().await.with_path("syncing", &temp_path)?;
    }

    if let Err(e) = fs::rename(&temp_path, path).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(e).with_path("replacing", path);
    }

    Ok(())
}

/// Convenience wrapper around [`atomic_write`] for string content.
pub async fn safe_write(path: &Path, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes()).await
}

// `with_extension` would turn `zintconfig.h` into `zintconfig.tmp`, which
// could collide with a real file; append instead.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_atomic_write_creates_parents() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("backend").join("zintconfig.h");

        atomic_write(&path, b"#define A 1").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "#define A 1");
        assert!(!temp.path().join("backend/zintconfig.h.tmp").exists());
    }

    #[tokio::test]
    async fn test_atomic_write_overwrites() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("out.txt");
        std::fs::write(&path, "a much longer original content").unwrap();

        safe_write(&path, "short").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "short");
    }

    #[test]
    fn test_temp_path_keeps_extension() {
        assert_eq!(
            temp_path_for(Path::new("backend/zintconfig.h")),
            PathBuf::from("backend/zintconfig.h.tmp")
        );
    }
}
