//! Archive sources that never touch the network.

use crate::core::{Result, VendorError};
use crate::fetch::{ArchiveSource, FetchedArchive};
use std::future::Future;

/// Returns the same bytes for every URL.
pub struct StaticArchiveSource {
    bytes: Vec<u8>,
}

impl StaticArchiveSource {
    /// Serve `bytes`.
    pub const fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
        }
    }
}

impl ArchiveSource for StaticArchiveSource {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedArchive>> + Send {
        let archive = FetchedArchive::new(url, self.bytes.clone());
        async move { Ok(archive) }
    }
}

/// Fails every fetch with the given HTTP status.
pub struct FailingSource {
    status: u16,
}

impl FailingSource {
    /// Answer every request with `status`.
    pub const fn with_status(status: u16) -> Self {
        Self {
            status,
        }
    }
}

impl ArchiveSource for FailingSource {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedArchive>> + Send {
        let err = VendorError::HttpStatus {
            url: url.to_string(),
            status: self.status,
        };
        async move { Err(err) }
    }
}
