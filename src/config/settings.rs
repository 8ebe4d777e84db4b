//! Effective settings for one run.

use super::ProjectConfig;
use crate::constants::{
    DEFAULT_ARCHIVE_URL, DEFAULT_BUILD_FILE, DEFAULT_CONFIG_HEADER, DEFAULT_VENDOR_DIR, PACKAGE_JSON,
};
use crate::core::Result;
use crate::patch::{PatchRule, builtin_rules};
use crate::version::{RefSources, ResolvedRef, read_package_json_version};
use std::path::{Path, PathBuf};

/// Configuration with defaults applied and paths made absolute.
#[derive(Debug, Clone)]
pub struct VendorSettings {
    /// Directory the configuration is anchored at
    pub project_root: PathBuf,
    /// Vendor tree location
    pub vendor_dir: PathBuf,
    /// Archive URL template containing `{ref}`
    pub archive_url: String,
    /// Build description inside the vendor tree
    pub build_file: PathBuf,
    /// Generated header inside the vendor tree
    pub config_header: PathBuf,
    /// Patch rules, in application order
    pub rules: Vec<PatchRule>,
    /// Expected archive digest, if pinned
    pub sha256: Option<String>,
    /// Ref pinned in the configuration file
    pub pinned_version: Option<String>,
}

impl VendorSettings {
    /// Defaults for a project rooted at `project_root`.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        let vendor_dir = project_root.join(DEFAULT_VENDOR_DIR);
        Self {
            build_file: vendor_dir.join(DEFAULT_BUILD_FILE),
            config_header: vendor_dir.join(DEFAULT_CONFIG_HEADER),
            vendor_dir,
            project_root,
            archive_url: DEFAULT_ARCHIVE_URL.to_string(),
            rules: builtin_rules(),
            sha256: None,
            pinned_version: None,
        }
    }

    /// Apply a loaded project configuration over the defaults.
    pub fn from_project(project: &ProjectConfig) -> Self {
        let config = &project.config;
        let mut settings = Self::new(&project.root);

        if let Some(dir) = &config.vendor_dir {
            settings.vendor_dir = project.root.join(dir);
        }
        settings.build_file = settings
            .vendor_dir
            .join(config.build_file.as_deref().unwrap_or(Path::new(DEFAULT_BUILD_FILE)));
        settings.config_header = settings
            .vendor_dir
            .join(config.config_header.as_deref().unwrap_or(Path::new(DEFAULT_CONFIG_HEADER)));

        if let Some(url) = &config.archive_url {
            settings.archive_url = url.trim().to_string();
        }
        if let Some(rules) = &config.patches {
            settings.rules = rules.clone();
        }
        settings.sha256 = config.sha256.clone();
        settings.pinned_version = config.version.clone();
        settings
    }

    /// `package.json` of the wrapper project.
    pub fn package_json(&self) -> PathBuf {
        self.project_root.join(PACKAGE_JSON)
    }

    /// Resolve the ref to vendor, honoring `override_ref` first.
    ///
    /// `package.json` is only read when neither the override nor the
    /// configuration pins a ref.
    pub async fn resolve_ref(&self, override_ref: Option<&str>) -> Result<ResolvedRef> {
        let mut sources = RefSources {
            cli: override_ref.map(str::to_string),
            config: self.pinned_version.clone(),
            package_json: None,
        };

        let pinned = [&sources.cli, &sources.config]
            .into_iter()
            .flatten()
            .any(|value| !value.trim().is_empty());
        if !pinned {
            sources.package_json = read_package_json_version(&self.package_json()).await?;
        }

        Ok(sources.resolve())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VendorConfig;
    use crate::version::RefOrigin;
    use tempfile::tempdir;

    fn project(root: &Path, content: &str) -> ProjectConfig {
        ProjectConfig {
            config: VendorConfig::parse(content, Path::new("zint-vendor.toml")).unwrap(),
            path: Some(root.join("zint-vendor.toml")),
            root: root.to_path_buf(),
        }
    }

    #[test]
    fn test_defaults() {
        let settings = VendorSettings::new("/work/app");

        assert_eq!(settings.vendor_dir, Path::new("/work/app/.zint"));
        assert_eq!(settings.build_file, Path::new("/work/app/.zint/CMakeLists.txt"));
        assert_eq!(settings.config_header, Path::new("/work/app/.zint/backend/zintconfig.h"));
        assert_eq!(settings.archive_url, DEFAULT_ARCHIVE_URL);
        assert_eq!(settings.rules, builtin_rules());
    }

    #[test]
    fn test_overrides() {
        let settings = VendorSettings::from_project(&project(
            Path::new("/work/app"),
            r#"
vendor_dir = "deps/zint"
config_header = "include/zintconfig.h"
archive_url = "https://mirror.example/{ref}.tgz"

[[patch]]
file = "backend/output.c"

[[patch.replace]]
find = "a"
with = "b"
"#,
        ));

        assert_eq!(settings.vendor_dir, Path::new("/work/app/deps/zint"));
        assert_eq!(settings.build_file, Path::new("/work/app/deps/zint/CMakeLists.txt"));
        assert_eq!(settings.config_header, Path::new("/work/app/deps/zint/include/zintconfig.h"));
        assert_eq!(settings.archive_url, "https://mirror.example/{ref}.tgz");
        assert_eq!(settings.rules.len(), 1);
        assert_eq!(settings.rules[0].file, Path::new("backend/output.c"));
    }

    #[tokio::test]
    async fn test_resolve_ref_priority() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("package.json"), r#"{"zintVersion": "2.11.0"}"#).unwrap();

        let settings = VendorSettings::from_project(&project(temp.path(), "version = \"2.12.0\""));
        let resolved = settings.resolve_ref(Some("2.13.0")).await.unwrap();
        assert_eq!(resolved.name, "2.13.0");
        assert_eq!(resolved.origin, RefOrigin::Override);

        let resolved = settings.resolve_ref(None).await.unwrap();
        assert_eq!(resolved.name, "2.12.0");
        assert_eq!(resolved.origin, RefOrigin::ConfigFile);

        let settings = VendorSettings::new(temp.path());
        let resolved = settings.resolve_ref(Some("  ")).await.unwrap();
        assert_eq!(resolved.name, "2.11.0");
        assert_eq!(resolved.origin, RefOrigin::PackageJson);
    }

    #[tokio::test]
    async fn test_resolve_ref_default() {
        let temp = tempdir().unwrap();

        let resolved = VendorSettings::new(temp.path()).resolve_ref(None).await.unwrap();

        assert_eq!(resolved.name, "master");
        assert_eq!(resolved.origin, RefOrigin::Default);
    }
}
