//! The vendoring pipeline.
//!
//! ```text
//! prepare ──► fetch ──► extract ──► patch ──► configure
//! (clear)    (HTTP)    (untar)     (rules)   (zintconfig.h)
//! ```
//!
//! Stages run strictly one after another. The first failure aborts the run
//! and is returned as a [`PipelineError`] naming the stage; nothing is
//! retried. A failed run may leave the vendor directory empty or partially
//! patched, which the next run's prepare stage clears.

use crate::config::VendorSettings;
use crate::configure::{VersionToken, synthesize_config};
use crate::core::{PipelineError, Result, Stage};
use crate::extract::{ExtractSummary, extract_bytes};
use crate::fetch::{ArchiveSource, archive_url};
use crate::patch::{DiskFs, PatchReport, apply_patches};
use crate::vendor_dir::prepare_vendor_dir;
use std::time::{Duration, Instant};
use tracing::info;

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// The ref that was vendored
    pub git_ref: String,
    /// Where the archive was downloaded from
    pub url: String,
    /// `sha256:<hex>` of the downloaded archive
    pub sha256: String,
    /// Extraction outcome
    pub extract: ExtractSummary,
    /// Patch outcome
    pub patches: PatchReport,
    /// Version definitions written to the config header
    pub tokens: Vec<VersionToken>,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

/// Runs the stages against one vendor directory.
pub struct VendorPipeline<S> {
    settings: VendorSettings,
    source: S,
}

trait StageResultExt<T> {
    fn at(self, stage: Stage) -> std::result::Result<T, PipelineError>;
}

impl<T> StageResultExt<T> for Result<T> {
    fn at(self, stage: Stage) -> std::result::Result<T, PipelineError> {
        self.map_err(|source| PipelineError::new(stage, source))
    }
}

impl<S: ArchiveSource> VendorPipeline<S> {
    /// Pipeline over `settings`, downloading through `source`.
    pub const fn new(settings: VendorSettings, source: S) -> Self {
        Self {
            settings,
            source,
        }
    }

    /// Settings in effect.
    pub const fn settings(&self) -> &VendorSettings {
        &self.settings
    }

    /// Vendor `git_ref` from scratch.
    ///
    /// # Errors
    ///
    /// The first failing stage, wrapped in [`PipelineError`].
    pub async fn run(&self, git_ref: &str) -> std::result::Result<PipelineReport, PipelineError> {
        let started = Instant::now();
        let settings = &self.settings;
        let vendor_dir = &settings.vendor_dir;
        info!("Vendoring zint {git_ref} into {}", vendor_dir.display());

        prepare_vendor_dir(vendor_dir).await.at(Stage::Prepare)?;

        let url = archive_url(&settings.archive_url, git_ref);
        let archive = self.source.fetch(&url).await.at(Stage::Fetch)?;
        if let Some(expected) = &settings.sha256 {
            archive.verify(expected).at(Stage::Fetch)?;
        }
        let sha256 = archive.sha256.clone();

        let extract = extract_bytes(archive.bytes, vendor_dir.clone()).await.at(Stage::Extract)?;

        let patches = apply_patches(&DiskFs, vendor_dir, &settings.rules).await.at(Stage::Patch)?;

        let tokens = synthesize_config(&settings.build_file, &settings.config_header)
            .await
            .at(Stage::Configure)?;

        let elapsed = started.elapsed();
        info!("Vendored zint {git_ref} in {:.1}s", elapsed.as_secs_f64());

        Ok(PipelineReport {
            git_ref: git_ref.to_string(),
            url,
            sha256,
            extract,
            patches,
            tokens,
            elapsed,
        })
    }
}
