//! In-memory [`PatchFs`].

use crate::patch::PatchFs;
use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A file tree held in a map, counting writes.
#[derive(Default)]
pub struct MemoryFs {
    files: Mutex<HashMap<PathBuf, String>>,
    writes: AtomicUsize,
}

impl MemoryFs {
    /// Empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file.
    pub fn with_file(self, path: impl Into<PathBuf>, contents: &str) -> Self {
        self.files.lock().unwrap().insert(path.into(), contents.to_string());
        self
    }

    /// Current contents of `path`.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.lock().unwrap().get(path.as_ref()).cloned()
    }

    /// Number of writes performed through [`PatchFs::write`].
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl PatchFs for MemoryFs {
    fn read_to_string(&self, path: &Path) -> impl Future<Output = io::Result<String>> + Send {
        let result = self
            .files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound));
        async move { result }
    }

    fn write(&self, path: &Path, contents: &str) -> impl Future<Output = io::Result<()>> + Send {
        self.files.lock().unwrap().insert(path.to_path_buf(), contents.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        async { Ok(()) }
    }
}
