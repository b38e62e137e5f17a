//! Domain types for template/manifest synchronization.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.
//! Report types are serializable via serde for machine-readable output.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed project identifier recovered from a file path.
///
/// Derived by [`KeyPolicy::derive`](crate::keypath::KeyPolicy::derive); a path
/// with no matching segment has *no* key, which is represented as
/// `Option<ProjectKey>` — an empty string is never a valid key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ProjectKey(pub String);

impl fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ProjectKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProjectKey {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Embedded reference
// ---------------------------------------------------------------------------

/// The `(package, version)` pair parsed out of one assembly directive line.
///
/// `package` is the raw token from the path fragment and may carry a trailing
/// `.` separator; callers trim it before manifest lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedReference {
    pub package: String,
    pub version: String,
}

// ---------------------------------------------------------------------------
// Run warnings
// ---------------------------------------------------------------------------

/// Non-fatal signal accumulated during a run.
///
/// Warnings never abort a run; they are carried on the [`RunReport`] so the
/// caller can surface them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunWarning {
    /// A manifest's path yields no project key; its packages are not indexed.
    ManifestUnkeyed { manifest: PathBuf },

    /// A manifest could not be read or parsed; its project is absent from the
    /// index and that project's templates are left untouched.
    ManifestUnparsed { manifest: PathBuf, message: String },

    /// Two manifests resolved to the same project key. The later one wins;
    /// the earlier one's packages are discarded.
    ManifestCollision {
        key: ProjectKey,
        earlier: PathBuf,
        later: PathBuf,
    },

    /// A template could not be read or its rewrite could not be written.
    /// The file is left as-is and is not counted as changed.
    TemplateFailed { template: PathBuf, message: String },
}

impl fmt::Display for RunWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunWarning::ManifestUnkeyed { manifest } => {
                write!(f, "no project key for manifest {}", manifest.display())
            }
            RunWarning::ManifestUnparsed { manifest, message } => {
                write!(f, "skipped manifest {}: {message}", manifest.display())
            }
            RunWarning::ManifestCollision { key, earlier, later } => write!(
                f,
                "manifests {} and {} both map to project '{key}'; using {}",
                earlier.display(),
                later.display(),
                later.display(),
            ),
            RunWarning::TemplateFailed { template, message } => {
                write!(f, "failed to process {}: {message}", template.display())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Run report
// ---------------------------------------------------------------------------

/// Per-run result value: counters, timing, and accumulated warnings.
///
/// Built fresh for every run and returned to the caller — there is no shared
/// mutable counter state, so independent runs (or a future parallel variant)
/// cannot race on it.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Wall-clock instant the run started.
    pub started_at: DateTime<Utc>,
    /// Total run duration in milliseconds.
    pub elapsed_ms: u64,
    /// `true` when the run was a dry run and `changed_files` were not written.
    pub dry_run: bool,
    /// Number of template files discovered and processed.
    pub templates_seen: usize,
    /// Number of template files rewritten (or that would be, under dry run).
    pub files_changed: usize,
    /// Number of directive lines rewritten across all files.
    pub references_changed: usize,
    /// Paths of the rewritten files.
    pub changed_files: Vec<PathBuf>,
    /// Non-fatal signals accumulated during the run.
    pub warnings: Vec<RunWarning>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
