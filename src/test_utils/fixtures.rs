//! In-memory archive fixtures.

use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;

/// Build script excerpt carrying the version tokens.
pub const CMAKE_LISTS: &str = "\
cmake_minimum_required(VERSION 3.5)
project(zint-package)

set(ZINT_VERSION_MAJOR 2)
set(ZINT_VERSION_MINOR 13)
set(ZINT_VERSION_RELEASE 0)
set(ZINT_VERSION_BUILD 9) # Set to non-zero for development versions
";

/// `backend/library.c` excerpt containing both built-in patch sites.
pub const LIBRARY_C: &str = "\
#include <assert.h>
#include <errno.h>
#include \"common.h\"
#include \"eci.h\"
#include \"gs1.h\"
#include \"output.h\"
#include \"zfiletypes.h\"

/* It's assumed that int is at least 32 bits, the following will compile-time fail if not */
typedef char static_assert_int_at_least_32bits[sizeof(int) * CHAR_BIT < 32 ? -1 : 1];

static int dump_plot(struct zint_symbol *symbol) {
    FILE *f;
    int i, r;
    int output_to_stdout = symbol->output_options & BARCODE_STDOUT;

    if (output_to_stdout) {
        f = stdout;
    } else {
        f = out_fopen(symbol->outfile, \"w\");
        if (!f) {
            return errtxt(ZINT_ERROR_FILE_ACCESS, symbol, 201, \"Could not open output file\");
        }
    }

    fputs(\"[\", f);
    return 0;
}
";

struct Entry {
    path: String,
    contents: Vec<u8>,
    mode: u32,
}

/// Builder for tar archives with an optional top-level directory.
#[derive(Default)]
pub struct FixtureArchive {
    root: Option<String>,
    entries: Vec<Entry>,
}

impl FixtureArchive {
    /// Empty archive; entries are nested under `root` when given.
    pub fn new(root: Option<&str>) -> Self {
        Self {
            root: root.map(str::to_string),
            entries: Vec::new(),
        }
    }

    /// A minimal zint source tree under `root`.
    pub fn zint(root: &str) -> Self {
        Self::new(Some(root))
            .file("CMakeLists.txt", CMAKE_LISTS)
            .file("backend/library.c", LIBRARY_C)
            .file("backend/zfiletypes.h", "/* file type helpers */\n")
            .file("backend/zint.h", "int ZBarcode_Version(void);\n")
            .file("README", "Zint barcode generator\n")
    }

    /// Add a regular file (mode 0644).
    pub fn file(self, path: &str, contents: impl AsRef<[u8]>) -> Self {
        self.entry(path, contents, 0o644)
    }

    /// Add an executable file (mode 0755).
    pub fn executable(self, path: &str, contents: impl AsRef<[u8]>) -> Self {
        self.entry(path, contents, 0o755)
    }

    fn entry(mut self, path: &str, contents: impl AsRef<[u8]>, mode: u32) -> Self {
        self.entries.push(Entry {
            path: path.to_string(),
            contents: contents.as_ref().to_vec(),
            mode,
        });
        self
    }

    /// Raw tar bytes.
    pub fn tar(&self) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());

        if let Some(root) = &self.root {
            let mut header = tar::Header::new_gnu();
            header.set_entry_type(tar::EntryType::Directory);
            header.set_mode(0o755);
            header.set_size(0);
            header.set_mtime(1_700_000_000);
            header.set_cksum();
            builder.append_data(&mut header, root, std::io::empty()).unwrap();
        }

        for entry in &self.entries {
            let path = match &self.root {
                Some(root) => format!("{root}/{}", entry.path),
                None => entry.path.clone(),
            };
            let mut header = tar::Header::new_gnu();
            header.set_size(entry.contents.len() as u64);
            header.set_mode(entry.mode);
            header.set_mtime(1_700_000_000);
            header.set_cksum();
            builder.append_data(&mut header, path, entry.contents.as_slice()).unwrap();
        }

        builder.into_inner().unwrap()
    }

    /// gzip-compressed tar bytes.
    pub fn tar_gz(&self) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&self.tar()).unwrap();
        encoder.finish().unwrap()
    }
}
