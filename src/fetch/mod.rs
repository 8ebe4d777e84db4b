//! Archive download.
//!
//! The fetch stage turns a ref into an archive URL and downloads it into
//! memory. The body is streamed chunk by chunk so a progress bar can report
//! bytes received; nothing is written to disk until extraction.
//!
//! Downloads go through the [`ArchiveSource`] trait. [`HttpArchiveSource`] is
//! the real implementation; tests substitute canned archives.
//!
//! # Failure mapping
//!
//! | Condition                                   | Error                                  |
//! |---------------------------------------------|----------------------------------------|
//! | DNS, TLS, connect or timeout failure        | [`VendorError::Network`]               |
//! | Non-2xx status                              | [`VendorError::HttpStatus`]            |
//! | Success status with zero body bytes         | [`VendorError::EmptyBody`]             |
//! | Body ends before `Content-Length` is reached | [`VendorError::StreamTruncated`]      |

mod checksum;

pub use checksum::ChecksumVerifier;

use crate::constants::{HTTP_CONNECT_TIMEOUT, HTTP_TIMEOUT, REF_PLACEHOLDER, USER_AGENT};
use crate::core::{Result, VendorError};
use crate::utils::progress::ProgressBar;
use futures::StreamExt;
use std::future::Future;
use tracing::{debug, info};

/// Upper bound on the buffer reserved up front from `Content-Length`.
const MAX_PREALLOC: u64 = 64 * 1024 * 1024;

/// Build the archive URL for `git_ref` from a template containing `{ref}`.
///
/// A template without the placeholder is used as-is.
///
/// # Examples
///
/// ```rust
/// use zint_vendor::fetch::archive_url;
///
/// assert_eq!(
///     archive_url("https://github.com/zint/zint/archive/{ref}.tar.gz", "2.13.0"),
///     "https://github.com/zint/zint/archive/2.13.0.tar.gz"
/// );
/// ```
pub fn archive_url(template: &str, git_ref: &str) -> String {
    template.replace(REF_PLACEHOLDER, git_ref)
}

/// A fully received archive.
#[derive(Debug, Clone)]
pub struct FetchedArchive {
    /// Where the archive came from
    pub url: String,
    /// Raw archive bytes (gzip or tar)
    pub bytes: Vec<u8>,
    /// `sha256:<hex>` digest of `bytes`
    pub sha256: String,
}

impl FetchedArchive {
    /// Wrap received bytes, computing their digest.
    pub fn new(url: impl Into<String>, bytes: Vec<u8>) -> Self {
        let sha256 = ChecksumVerifier::compute_sha256(&bytes);
        Self {
            url: url.into(),
            bytes,
            sha256,
        }
    }

    /// Check the digest against a pinned value.
    ///
    /// # Errors
    ///
    /// [`VendorError::ChecksumMismatch`] if the digests differ.
    pub fn verify(&self, expected: &str) -> Result<()> {
        if ChecksumVerifier::matches(&self.sha256, expected) {
            Ok(())
        } else {
            Err(VendorError::ChecksumMismatch {
                url: self.url.clone(),
                expected: expected.to_string(),
                actual: self.sha256.clone(),
            })
        }
    }
}

/// Something that can produce archive bytes for a URL.
pub trait ArchiveSource {
    /// Download the archive at `url`.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedArchive>> + Send;
}

/// [`ArchiveSource`] that downloads over HTTP(S) with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpArchiveSource {
    client: reqwest::Client,
    show_progress: bool,
}

impl HttpArchiveSource {
    /// Client with the default timeouts and user agent.
    ///
    /// # Errors
    ///
    /// [`VendorError::Network`] if the HTTP client cannot be initialized
    /// (e.g. the TLS backend fails to load).
    pub fn new(show_progress: bool) -> Result<Self> {
        let client = Self::client_builder()
            .build()
            .map_err(|source| VendorError::Network {
                url: "(client setup)".to_string(),
                source,
            })?;
        Ok(Self::with_client(client, show_progress))
    }

    /// Builder preset with the user agent and timeouts used by [`new`](Self::new).
    ///
    /// Callers that need extra settings (a proxy policy, say) start here so
    /// the defaults are kept.
    pub fn client_builder() -> reqwest::ClientBuilder {
        reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(HTTP_CONNECT_TIMEOUT)
            .timeout(HTTP_TIMEOUT)
    }

    /// Use a preconfigured client.
    pub const fn with_client(client: reqwest::Client, show_progress: bool) -> Self {
        Self {
            client,
            show_progress,
        }
    }

    async fn download(&self, url: &str) -> Result<FetchedArchive> {
        info!("Fetching {url}");

        let response = self.client.get(url).send().await.map_err(|source| VendorError::Network {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(VendorError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let expected = response.content_length();
        debug!("Response {status}, content length {expected:?}");

        let bar = ProgressBar::download(expected, self.show_progress);
        bar.set_prefix("zint");

        let capacity = usize::try_from(expected.unwrap_or(0).min(MAX_PREALLOC)).unwrap_or(0);
        let mut bytes = Vec::with_capacity(capacity);
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(source) => {
                    bar.finish_and_clear();
                    return Err(body_error(url, source, bytes.len(), expected));
                }
            };
            bytes.extend_from_slice(&chunk);
            bar.inc(chunk.len() as u64);
        }
        bar.finish_and_clear();

        let received = bytes.len() as u64;
        if received == 0 {
            return Err(VendorError::EmptyBody {
                url: url.to_string(),
            });
        }
        if let Some(total) = expected.filter(|&total| received < total) {
            return Err(VendorError::StreamTruncated {
                reason: format!("{url}: received {received} of {total} bytes"),
            });
        }

        info!("Received {received} bytes from {url}");
        Ok(FetchedArchive::new(url, bytes))
    }
}

impl ArchiveSource for HttpArchiveSource {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedArchive>> + Send {
        let url = url.to_string();
        async move { self.download(&url).await }
    }
}

/// Map an error raised while reading the body.
///
/// Any non-timeout failure that leaves the body short of `Content-Length`
/// is a truncated stream, whichever kind reqwest reports it as (body or
/// decode). Without a known length, body and decode errors still count as
/// truncation. Timeouts and everything else stay transport errors.
fn body_error(url: &str, source: reqwest::Error, received: usize, expected: Option<u64>) -> VendorError {
    let short = expected.is_some_and(|total| (received as u64) < total);
    if !source.is_timeout() && (short || source.is_body() || source.is_decode()) {
        let of = expected.map(|total| format!(" of {total}")).unwrap_or_default();
        VendorError::StreamTruncated {
            reason: format!("{url}: connection closed after {received}{of} bytes ({source})"),
        }
    } else {
        VendorError::Network {
            url: url.to_string(),
            source,
        }
    }
}
