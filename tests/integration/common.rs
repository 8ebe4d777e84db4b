//! Shared helpers for the integration suite.

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Directory holding golden output files.
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// Read a golden file from `tests/fixtures/expected`.
pub fn expected(name: &str) -> String {
    std::fs::read_to_string(fixtures_dir().join("expected").join(name)).unwrap()
}

/// A scratch project directory.
pub struct TestProject {
    pub temp: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Write a file relative to the project root, creating parents.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.path().join(relative)).unwrap()
    }

    /// `zint-vendor` rooted at this project, isolated from the caller's
    /// environment.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("zint-vendor").unwrap();
        cmd.arg("--project-dir")
            .arg(self.path())
            .env_remove("ZINT_VENDOR_CONFIG")
            .env_remove("RUST_LOG")
            .env_remove("HTTP_PROXY")
            .env_remove("HTTPS_PROXY")
            .env_remove("http_proxy")
            .env_remove("https_proxy")
            .env("NO_COLOR", "1")
            .env("NO_PROXY", "127.0.0.1");
        cmd
    }
}
