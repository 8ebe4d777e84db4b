//! File access used by the patch applicator.

use std::future::Future;
use std::io;
use std::path::Path;

/// Minimal file system surface the patch applicator needs.
///
/// [`DiskFs`] is the real implementation; tests use an in-memory tree.
pub trait PatchFs {
    /// Read a whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> impl Future<Output = io::Result<String>> + Send;

    /// Replace a file's contents.
    fn write(&self, path: &Path, contents: &str) -> impl Future<Output = io::Result<()>> + Send;
}

/// [`PatchFs`] backed by the real file system through `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFs;

impl PatchFs for DiskFs {
    fn read_to_string(&self, path: &Path) -> impl Future<Output = io::Result<String>> + Send {
        let path = path.to_path_buf();
        async move { tokio::fs::read_to_string(path).await }
    }

    fn write(&self, path: &Path, contents: &str) -> impl Future<Output = io::Result<()>> + Send {
        let path = path.to_path_buf();
        let contents = contents.to_string();
        async move { tokio::fs::write(path, contents).await }
    }
}
