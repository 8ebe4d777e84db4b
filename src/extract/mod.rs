//! Archive extraction.
//!
//! The extractor accepts either a gzip-compressed tar stream or a raw tar
//! stream. The format is chosen by peeking at the first two bytes: the gzip
//! magic `1f 8b` selects a [`GzDecoder`], anything else is read as tar.
//!
//! # Layout normalization
//!
//! Source archives usually wrap the project in one directory named after the
//! ref (`zint-master/`, `zint-2.13.0/`). When every entry sits under a single
//! top-level directory, that directory's contents become the vendor root.
//! Archives with several top-level entries are unpacked as they are.
//!
//! # All-or-nothing
//!
//! Entries are unpacked into a staging directory created beside `dest`. Only
//! a fully unpacked tree is renamed onto `dest`; on any failure the staging
//! directory is removed and `dest` keeps its previous (empty) state.

use crate::core::{IoResultExt, Result, VendorError};
use flate2::read::GzDecoder;
use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fmt;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Container format detected from the stream header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// gzip-compressed tar
    Gzip,
    /// Uncompressed tar
    Tar,
}

impl ArchiveFormat {
    /// Detect the format from the first bytes of a stream.
    pub fn sniff(header: &[u8]) -> Self {
        if header.starts_with(&GZIP_MAGIC) {
            Self::Gzip
        } else {
            Self::Tar
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gzip => f.write_str("tar.gz"),
            Self::Tar => f.write_str("tar"),
        }
    }
}

/// Outcome of a successful extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Detected container format
    pub format: ArchiveFormat,
    /// Regular files written
    pub files: usize,
    /// Top-level directory removed by normalization, if any
    pub stripped_root: Option<String>,
}

/// Shape of the archive's top level, collected while unpacking.
#[derive(Default)]
struct TopLevel {
    names: BTreeSet<OsString>,
    has_top_level_file: bool,
}

impl TopLevel {
    fn record(&mut self, path: &Path, is_dir: bool) {
        let mut normal = path.components().filter_map(|c| match c {
            Component::Normal(name) => Some(name),
            _ => None,
        });
        let Some(first) = normal.next() else {
            return;
        };
        if normal.next().is_none() && !is_dir {
            self.has_top_level_file = true;
        }
        self.names.insert(first.to_os_string());
    }

    fn single_root(&self) -> Option<&OsString> {
        if self.names.len() == 1 && !self.has_top_level_file {
            self.names.first()
        } else {
            None
        }
    }
}

/// Unpack an archive stream into `dest`.
///
/// `dest` is replaced by the extracted tree; it must be empty or absent.
///
/// # Errors
///
/// - [`VendorError::ArchiveCorrupt`] for malformed gzip/tar data or an archive
///   without entries
/// - [`VendorError::StreamTruncated`] when input ends mid-archive
/// - [`VendorError::Io`] when writing the tree fails
pub fn extract_archive<R: Read>(reader: R, dest: &Path) -> Result<ExtractSummary> {
    let mut reader = BufReader::new(reader);
    let header = reader.fill_buf().map_err(|e| VendorError::from_archive_io(e, dest))?;
    let format = ArchiveFormat::sniff(header);
    debug!("Detected {format} stream for {}", dest.display());

    let parent = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).with_path("creating directory", parent)?;
    let staging = tempfile::Builder::new()
        .prefix(".zint-extract-")
        .tempdir_in(parent)
        .with_path("creating staging directory in", parent)?;

    let (files, top_level) = match format {
        ArchiveFormat::Gzip => {
            let (files, top_level, mut decoder) =
                unpack_entries(GzDecoder::new(reader), staging.path(), dest)?;
            // Reading to the end validates the gzip trailer (CRC and length).
            io::copy(&mut decoder, &mut io::sink()).map_err(|e| VendorError::from_archive_io(e, dest))?;
            (files, top_level)
        }
        ArchiveFormat::Tar => {
            let (files, top_level, _) = unpack_entries(reader, staging.path(), dest)?;
            (files, top_level)
        }
    };

    if top_level.names.is_empty() {
        return Err(VendorError::ArchiveCorrupt {
            reason: "archive contains no entries".to_string(),
        });
    }

    let stripped_root = top_level.single_root().map(|name| name.to_string_lossy().into_owned());
    let root = match top_level.single_root() {
        Some(name) => staging.path().join(name),
        None => {
            // The staging directory is created 0700; the published root must not be.
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(staging.path(), std::fs::Permissions::from_mode(0o755))
                    .with_path("setting permissions on", staging.path())?;
            }
            staging.path().to_path_buf()
        }
    };

    publish(&root, dest)?;

    info!("Extracted {files} file(s) from {format} archive into {}", dest.display());
    if let Some(name) = &stripped_root {
        debug!("Stripped top-level directory {name}");
    }

    Ok(ExtractSummary {
        format,
        files,
        stripped_root,
    })
}

/// [`extract_archive`] over an in-memory archive, run on the blocking pool.
pub async fn extract_bytes(bytes: Vec<u8>, dest: PathBuf) -> Result<ExtractSummary> {
    let join_dest = dest.clone();
    tokio::task::spawn_blocking(move || extract_archive(io::Cursor::new(bytes), &dest))
        .await
        .map_err(|e| VendorError::io("extracting archive into", join_dest, io::Error::other(e)))?
}

fn unpack_entries<R: Read>(
    reader: R,
    staging: &Path,
    dest: &Path,
) -> Result<(usize, TopLevel, R)> {
    let archive_err = |e: io::Error| VendorError::from_archive_io(e, dest);

    let mut archive = tar::Archive::new(reader);
    archive.set_preserve_permissions(true);
    archive.set_preserve_mtime(true);
    archive.set_overwrite(true);

    let mut files = 0;
    let mut top_level = TopLevel::default();

    for entry in archive.entries().map_err(archive_err)? {
        let mut entry = entry.map_err(archive_err)?;
        let kind = entry.header().entry_type();
        if kind.is_pax_global_extensions() {
            continue;
        }

        let path = entry.path().map_err(archive_err)?.into_owned();
        top_level.record(&path, kind.is_dir());

        if !entry.unpack_in(staging).map_err(archive_err)? {
            warn!("Skipped archive entry outside the extraction root: {}", path.display());
            continue;
        }
        if kind.is_file() {
            files += 1;
        }
    }

    Ok((files, top_level, archive.into_inner()))
}

fn publish(root: &Path, dest: &Path) -> Result<()> {
    match std::fs::remove_dir(dest) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(VendorError::io("replacing directory", dest, e)),
    }
    std::fs::rename(root, dest).with_path("moving extracted tree to", dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FixtureArchive;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn read_tree(root: &Path) -> BTreeMap<String, Vec<u8>> {
        fn walk(root: &Path, dir: &Path, out: &mut BTreeMap<String, Vec<u8>>) {
            for entry in std::fs::read_dir(dir).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    walk(root, &path, out);
                } else {
                    let rel = path.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/");
                    out.insert(rel, std::fs::read(&path).unwrap());
                }
            }
        }
        let mut out = BTreeMap::new();
        walk(root, root, &mut out);
        out
    }

    fn fixture() -> FixtureArchive {
        FixtureArchive::new(Some("zint-master"))
            .file("CMakeLists.txt", "set(ZINT_VERSION_MAJOR 2)\n")
            .file("backend/library.c", "f = stdout;\n")
            .file("backend/zint.h", "int ZBarcode_Version(void);\n")
    }

    #[test]
    fn test_sniff() {
        assert_eq!(ArchiveFormat::sniff(&[0x1f, 0x8b, 0x08]), ArchiveFormat::Gzip);
        assert_eq!(ArchiveFormat::sniff(b"zint-master/"), ArchiveFormat::Tar);
        assert_eq!(ArchiveFormat::sniff(&[0x1f]), ArchiveFormat::Tar);
        assert_eq!(ArchiveFormat::sniff(&[]), ArchiveFormat::Tar);
    }

    #[test]
    fn test_gzip_and_raw_tar_produce_identical_trees() {
        let temp = tempdir().unwrap();
        let from_gz = temp.path().join("gz");
        let from_tar = temp.path().join("tar");

        let gz = extract_archive(fixture().tar_gz().as_slice(), &from_gz).unwrap();
        let tar = extract_archive(fixture().tar().as_slice(), &from_tar).unwrap();

        assert_eq!(gz.format, ArchiveFormat::Gzip);
        assert_eq!(tar.format, ArchiveFormat::Tar);
        assert_eq!(gz.files, 3);
        assert_eq!(tar.files, 3);
        assert_eq!(read_tree(&from_gz), read_tree(&from_tar));
    }

    #[test]
    fn test_single_root_is_stripped() {
        let temp = tempdir().unwrap();
        let dest = temp.path().join(".zint");
        std::fs::create_dir(&dest).unwrap();

        let summary = extract_archive(fixture().tar_gz().as_slice(), &dest).unwrap();

        assert_eq!(summary.stripped_root.as_deref(), Some("zint-master"));
        assert!(dest.join("CMakeLists.txt").is_file());
        assert!(dest.join("backend/library.c").is_file());
        assert!(!dest.join("zint-master").exists());
    }

    #[test]
    fn test_multiple_roots_are_kept() {
        let temp = tempdir().unwrap();
        let dest = temp.path().join(".zint");
        let archive = FixtureArchive::new(None)
            .file("CMakeLists.txt", "set(ZINT_VERSION_MAJOR 2)\n")
            .file("backend/library.c", "f = stdout;\n");

        let summary = extract_archive(archive.tar().as_slice(), &dest).unwrap();

        assert_eq!(summary.stripped_root, None);
        assert!(dest.join("CMakeLists.txt").is_file());
        assert!(dest.join("backend/library.c").is_file());
    }

    #[test]
    fn test_single_top_level_file_is_not_stripped() {
        let temp = tempdir().unwrap();
        let dest = temp.path().join(".zint");
        let archive = FixtureArchive::new(None).file("CMakeLists.txt", "project(zint)\n");

        let summary = extract_archive(archive.tar().as_slice(), &dest).unwrap();

        assert_eq!(summary.stripped_root, None);
        assert!(dest.join("CMakeLists.txt").is_file());
    }

    #[test]
    fn test_truncated_gzip() {
        let temp = tempdir().unwrap();
        let dest = temp.path().join(".zint");
        let bytes = fixture().tar_gz();
        let truncated = &bytes[..bytes.len() / 2];

        let err = extract_archive(truncated, &dest).unwrap_err();

        assert!(matches!(err, VendorError::StreamTruncated { .. }), "{err:?}");
        assert!(!dest.exists());
    }

    #[test]
    fn test_truncated_tar() {
        let temp = tempdir().unwrap();
        let dest = temp.path().join(".zint");
        let bytes = fixture().tar();
        // Cut inside the first entry's data block.
        let truncated = &bytes[..1024 + 100];

        let err = extract_archive(truncated, &dest).unwrap_err();

        assert!(matches!(err, VendorError::StreamTruncated { .. }), "{err:?}");
    }

    #[test]
    fn test_garbage_is_corrupt() {
        let temp = tempdir().unwrap();
        let dest = temp.path().join(".zint");
        std::fs::create_dir(&dest).unwrap();
        let garbage = b"this is not an archive at all. ".repeat(64);

        let err = extract_archive(garbage.as_slice(), &dest).unwrap_err();

        assert!(matches!(err, VendorError::ArchiveCorrupt { .. }), "{err:?}");
        assert!(dest.is_dir());
        assert_eq!(std::fs::read_dir(&dest).unwrap().count(), 0);
    }

    #[test]
    fn test_corrupt_gzip_body() {
        let temp = tempdir().unwrap();
        let dest = temp.path().join(".zint");
        let mut bytes = vec![0x1f, 0x8b, 0x08, 0x00, 0, 0, 0, 0, 0x00, 0xff];
        bytes.extend_from_slice(&[0xff; 600]);

        let err = extract_archive(bytes.as_slice(), &dest).unwrap_err();

        assert!(matches!(err, VendorError::ArchiveCorrupt { .. }), "{err:?}");
    }

    #[test]
    fn test_empty_archive_is_corrupt() {
        let temp = tempdir().unwrap();
        let dest = temp.path().join(".zint");

        let err = extract_archive(FixtureArchive::new(None).tar().as_slice(), &dest).unwrap_err();

        assert!(matches!(err, VendorError::ArchiveCorrupt { .. }), "{err:?}");
    }

    #[test]
    fn test_no_staging_directory_left_behind() {
        let temp = tempdir().unwrap();
        let dest = temp.path().join(".zint");

        extract_archive(fixture().tar_gz().as_slice(), &dest).unwrap();
        let bytes = fixture().tar_gz();
        let _ = extract_archive(&bytes[..bytes.len() / 2], &temp.path().join("other"));

        let leftovers: Vec<_> = std::fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with(".zint-extract-"))
            .collect();
        assert!(leftovers.is_empty(), "{leftovers:?}");
    }

    #[test]
    #[cfg(unix)]
    fn test_permissions_preserved() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempdir().unwrap();
        let dest = temp.path().join(".zint");
        let archive = fixture().executable("tools/build.sh", "#!/bin/sh\n");

        extract_archive(archive.tar_gz().as_slice(), &dest).unwrap();

        let mode = std::fs::metadata(dest.join("tools/build.sh")).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
        let mode = std::fs::metadata(dest.join("CMakeLists.txt")).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0);
    }

    #[tokio::test]
    async fn test_extract_bytes() {
        let temp = tempdir().unwrap();
        let dest = temp.path().join(".zint");

        let summary = extract_bytes(fixture().tar_gz(), dest.clone()).await.unwrap();

        assert_eq!(summary.files, 3);
        assert!(dest.join("backend/zint.h").is_file());
    }
}
