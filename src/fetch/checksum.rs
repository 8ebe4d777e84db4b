//! SHA-256 digests for downloaded archives.
//!
//! Digests are written as `sha256:<hex>`. A pin in `zint-vendor.toml` may omit
//! the prefix and may use either hex case.

use sha2::{Digest, Sha256};
use tracing::{debug, info};

const PREFIX: &str = "sha256:";

/// Computes and checks archive digests.
pub struct ChecksumVerifier;

impl ChecksumVerifier {
    /// Digest of `bytes`, formatted as `sha256:<lowercase hex>`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use zint_vendor::fetch::ChecksumVerifier;
    ///
    /// assert_eq!(
    ///     ChecksumVerifier::compute_sha256(b"Hello, World!"),
    ///     "sha256:dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f"
    /// );
    /// ```
    pub fn compute_sha256(bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        format!("{PREFIX}{}", hex::encode(hasher.finalize()))
    }

    /// Whether `actual` (as returned by [`compute_sha256`](Self::compute_sha256))
    /// matches the pinned `expected` digest.
    pub fn matches(actual: &str, expected: &str) -> bool {
        let matched = normalize(actual) == normalize(expected);
        if matched {
            info!("Checksum verification successful");
        } else {
            debug!("Checksum mismatch: expected {expected}, actual {actual}");
        }
        matched
    }

    /// Whether `value` looks like a SHA-256 digest, with or without prefix.
    pub fn is_well_formed(value: &str) -> bool {
        let hex = normalize(value);
        hex.len() == 64 && hex.chars().all(|c| c.is_ascii_hexdigit())
    }
}

fn normalize(digest: &str) -> String {
    let digest = digest.trim();
    match digest.get(..PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(PREFIX) => digest[PREFIX.len()..].to_ascii_lowercase(),
        _ => digest.to_ascii_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_sha256() {
        assert_eq!(
            ChecksumVerifier::compute_sha256(b"Hello, World!"),
            "sha256:dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f"
        );
    }

    #[test]
    fn test_matches_case_insensitive() {
        let actual = ChecksumVerifier::compute_sha256(b"Test");
        let lowercase = "sha256:532eaabd9574880dbf76b9b8cc00832c20a6ec113d682299550d7a6e0f345e25";
        let uppercase = "SHA256:532EAABD9574880DBF76B9B8CC00832C20A6EC113D682299550D7A6E0F345E25";

        assert!(ChecksumVerifier::matches(&actual, lowercase));
        assert!(ChecksumVerifier::matches(&actual, uppercase));
    }

    #[test]
    fn test_matches_without_prefix() {
        let actual = ChecksumVerifier::compute_sha256(b"Test");
        assert!(ChecksumVerifier::matches(
            &actual,
            "532eaabd9574880dbf76b9b8cc00832c20a6ec113d682299550d7a6e0f345e25"
        ));
    }

    #[test]
    fn test_mismatch() {
        let actual = ChecksumVerifier::compute_sha256(b"Test content");
        assert!(!ChecksumVerifier::matches(&actual, &"0".repeat(64)));
    }

    #[test]
    fn test_is_well_formed() {
        assert!(ChecksumVerifier::is_well_formed(&"a".repeat(64)));
        assert!(ChecksumVerifier::is_well_formed(&format!("sha256:{}", "F".repeat(64))));
        assert!(!ChecksumVerifier::is_well_formed("sha256:abc"));
        assert!(!ChecksumVerifier::is_well_formed(&"g".repeat(64)));
    }
}
