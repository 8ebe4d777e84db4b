//! Path validation and project file discovery.

use std::path::{Component, Path, PathBuf};

/// Whether `path` is a non-empty relative path that cannot leave its base
/// directory: no root, no prefix, no `..`.
///
/// # Examples
///
/// ```rust
/// use zint_vendor::utils::fs::is_contained;
/// use std::path::Path;
///
/// assert!(is_contained(Path::new("backend/library.c")));
/// assert!(!is_contained(Path::new("../library.c")));
/// assert!(!is_contained(Path::new("/etc/passwd")));
/// ```
pub fn is_contained(path: &Path) -> bool {
    !path.as_os_str().is_empty()
        && path.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Search `start` and each of its ancestors for a file called `name`.
///
/// Returns the first match, closest to `start`.
pub fn find_upwards(start: &Path, name: &str) -> Option<PathBuf> {
    let start = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());
    start.ancestors().map(|dir| dir.join(name)).find(|candidate| candidate.is_file())
}
