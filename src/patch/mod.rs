//! Patch application for the vendored zint tree.
//!
//! Patches are declarative [`PatchRule`] records: a target file relative to
//! the vendor root and an ordered list of [`Replacement`]s. They come either
//! from [`builtin_rules`] or from `[[patch]]` tables in `zint-vendor.toml`:
//!
//! ```toml
//! [[patch]]
//! file = "backend/library.c"
//!
//! [[patch.replace]]
//! find = "f = stdout;"
//! with = "f = stderr;"
//!
//! [[patch.replace]]
//! find = 'strcpy\(symbol->outfile, "out\.(png|gif)"\);'
//! with = 'strcpy(symbol->outfile, "out.$1");'
//! regex = true
//! required = false
//! ```
//!
//! # Semantics
//!
//! - Rules run in declared order; replacements within a rule run in order,
//!   each against the output of the previous one.
//! - Every occurrence of a pattern is replaced.
//! - A `required` replacement (the default) that matches nothing fails the
//!   rule with [`VendorError::PatchNotApplied`]: the upstream source has
//!   drifted and the patch is stale. The target file is left untouched.
//! - A rule whose target is missing fails with
//!   [`VendorError::PatchTargetNotFound`].
//! - Each target is read once and written once, only if its content changed.
//!
//! Re-applying rules to an already patched tree is not guaranteed to be
//! harmless; the pipeline always patches a freshly extracted tree.
//!
//! File access goes through [`PatchFs`] so rules can be exercised against an
//! in-memory tree.

mod builtin;
mod fs;

pub use builtin::builtin_rules;
pub use fs::{DiskFs, PatchFs};

use crate::core::{Result, VendorError};
use crate::utils::fs::is_contained;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A set of replacements applied to one file in the vendor tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatchRule {
    /// Target path relative to the vendor root
    pub file: PathBuf,
    /// Replacements, applied in order
    #[serde(rename = "replace")]
    pub replacements: Vec<Replacement>,
}

/// One find/replace transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Replacement {
    /// Text (or regex, when `regex` is set) to look for
    pub find: String,
    /// Replacement text; regex replacements may use `$1`/`${name}` captures
    #[serde(rename = "with")]
    pub replacement: String,
    /// Treat `find` as a regular expression
    #[serde(default)]
    pub regex: bool,
    /// Fail the rule when `find` matches nothing
    #[serde(default = "default_required")]
    pub required: bool,
}

const fn default_required() -> bool {
    true
}

impl PatchRule {
    /// A rule for `file` with no replacements yet.
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            replacements: Vec::new(),
        }
    }

    /// Add a required literal replacement.
    #[must_use]
    pub fn literal(mut self, find: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.replacements.push(Replacement {
            find: find.into(),
            replacement: replacement.into(),
            regex: false,
            required: true,
        });
        self
    }

    /// Add a required regex replacement.
    #[must_use]
    pub fn regex(mut self, find: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.replacements.push(Replacement {
            find: find.into(),
            replacement: replacement.into(),
            regex: true,
            required: true,
        });
        self
    }

    /// Mark the most recently added replacement as optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        if let Some(last) = self.replacements.last_mut() {
            last.required = false;
        }
        self
    }

    /// Whether `file` stays inside the vendor root (relative, no `..`).
    pub fn is_contained(&self) -> bool {
        is_contained(&self.file)
    }
}

/// Compiled form of a [`Replacement`].
enum Matcher<'a> {
    Literal(&'a str),
    Regex(Regex),
}

impl Replacement {
    fn compile(&self, file: &Path) -> Result<Matcher<'_>> {
        let invalid = |reason: String| VendorError::InvalidPatchPattern {
            path: file.to_path_buf(),
            pattern: self.find.clone(),
            reason,
        };

        if self.find.is_empty() {
            return Err(invalid("pattern is empty".to_string()));
        }

        if self.regex {
            Regex::new(&self.find).map(Matcher::Regex).map_err(|e| invalid(e.to_string()))
        } else {
            Ok(Matcher::Literal(&self.find))
        }
    }
}

impl Matcher<'_> {
    /// Replace every match, returning the new text and the match count.
    fn apply<'c>(&self, content: &'c str, replacement: &str) -> (Cow<'c, str>, usize) {
        match self {
            Self::Literal(find) => {
                let count = content.matches(find).count();
                if count == 0 {
                    (Cow::Borrowed(content), 0)
                } else {
                    (Cow::Owned(content.replace(find, replacement)), count)
                }
            }
            Self::Regex(re) => {
                let count = re.find_iter(content).count();
                if count == 0 {
                    (Cow::Borrowed(content), 0)
                } else {
                    (re.replace_all(content, replacement), count)
                }
            }
        }
    }
}

/// Outcome of patching one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchedFile {
    /// Target path relative to the vendor root
    pub path: PathBuf,
    /// Total number of matches replaced
    pub replacements: usize,
    /// Whether the file content changed (and was written)
    pub changed: bool,
}

/// Summary of a patch run, one entry per rule in application order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchReport {
    /// Per-rule results
    pub files: Vec<PatchedFile>,
}

impl PatchReport {
    /// Total replacements across all files.
    pub fn total_replacements(&self) -> usize {
        self.files.iter().map(|f| f.replacements).sum()
    }
}

/// Apply `rules` in order to files under `root`.
///
/// Stops at the first failing rule; rules before it stay applied.
pub async fn apply_patches<F: PatchFs>(
    fs: &F,
    root: &Path,
    rules: &[PatchRule],
) -> Result<PatchReport> {
    let mut report = PatchReport::default();

    for rule in rules {
        let patched = apply_rule(fs, root, rule).await?;
        debug!(
            "Patched {} ({} replacement(s){})",
            patched.path.display(),
            patched.replacements,
            if patched.changed { "" } else { ", unchanged" }
        );
        report.files.push(patched);
    }

    info!(
        "Applied {} patch rule(s), {} replacement(s)",
        report.files.len(),
        report.total_replacements()
    );
    Ok(report)
}

/// Apply a single rule. The target is written only when every required
/// replacement matched.
pub async fn apply_rule<F: PatchFs>(fs: &F, root: &Path, rule: &PatchRule) -> Result<PatchedFile> {
    let not_found = || VendorError::PatchTargetNotFound {
        path: rule.file.clone(),
    };

    if !rule.is_contained() {
        return Err(not_found());
    }

    let target = root.join(&rule.file);
    let original = match fs.read_to_string(&target).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
        Err(e) => return Err(VendorError::io("reading patch target", target, e)),
    };

    let mut content = Cow::Borrowed(original.as_str());
    let mut replacements = 0;

    for replacement in &rule.replacements {
        let matcher = replacement.compile(&rule.file)?;
        let (next, count) = matcher.apply(&content, &replacement.replacement);

        if count == 0 {
            if replacement.required {
                return Err(VendorError::PatchNotApplied {
                    path: rule.file.clone(),
                    pattern: replacement.find.clone(),
                });
            }
            debug!(
                "Optional pattern {:?} matched nothing in {}",
                replacement.find,
                rule.file.display()
            );
            continue;
        }

        replacements += count;
        content = Cow::Owned(next.into_owned());
    }

    let changed = content != original.as_str();
    if changed {
        fs.write(&target, &content)
            .await
            .map_err(|e| VendorError::io("writing patch target", &target, e))?;
    }

    Ok(PatchedFile {
        path: rule.file.clone(),
        replacements,
        changed,
    })
}
