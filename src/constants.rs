//! Default values used throughout the crate.
//!
//! Every value here can be overridden from `zint-vendor.toml`; these are the
//! fallbacks when the project does not say otherwise.

use std::time::Duration;

/// Ref fetched when no version is pinned: zint's default branch.
pub const DEFAULT_REF: &str = "master";

/// Archive endpoint; `{ref}` is replaced with the pinned ref.
///
/// GitHub resolves both branch and tag names through `archive/<ref>.tar.gz`.
pub const DEFAULT_ARCHIVE_URL: &str = "https://github.com/zint/zint/archive/{ref}.tar.gz";

/// Placeholder substituted in archive URL templates.
pub const REF_PLACEHOLDER: &str = "{ref}";

/// Vendor directory, relative to the project root.
pub const DEFAULT_VENDOR_DIR: &str = ".zint";

/// Build description scanned for version tokens, relative to the vendor root.
pub const DEFAULT_BUILD_FILE: &str = "CMakeLists.txt";

/// Generated config header, relative to the vendor root.
pub const DEFAULT_CONFIG_HEADER: &str = "backend/zintconfig.h";

/// Project configuration file name.
pub const CONFIG_FILE_NAME: &str = "zint-vendor.toml";

/// Environment variable pointing at an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "ZINT_VENDOR_CONFIG";

/// Wrapper package metadata that may pin the zint version.
pub const PACKAGE_JSON: &str = "package.json";

/// Key in `package.json` holding the pinned zint ref.
pub const PACKAGE_JSON_VERSION_KEY: &str = "zintVersion";

/// Timeout for the whole archive download (5 minutes).
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(300);

/// Timeout for establishing the connection to the archive host (30 seconds).
pub const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with archive requests.
pub const USER_AGENT: &str = concat!("zint-vendor/", env!("CARGO_PKG_VERSION"));
