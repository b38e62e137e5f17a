//! Tree scanning for `ttsync-scanner`.
//!
//! `scan_tree(root)` walks a directory recursively and returns the files the
//! synchronizer cares about, already classified: package manifests (exact
//! base-name match) and template files (suffix match, excluding anything
//! under a vendored `packages` directory — those are extracted third-party
//! copies, not authored templates).

use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

/// Exact base name of a package manifest.
pub const MANIFEST_FILE_NAME: &str = "packages.config";

/// File extensions of template files.
pub const TEMPLATE_EXTENSIONS: [&str; 2] = ["tt", "ttinclude"];

/// Directory segment holding downloaded package contents.
pub const VENDORED_DIR_NAME: &str = "packages";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Classified results of one tree scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedFiles {
    /// Package manifests, anywhere under the root.
    pub manifests: Vec<PathBuf>,
    /// Authored template files (vendored copies already excluded).
    pub templates: Vec<PathBuf>,
}

/// Errors from tree scanning. Fatal for the run.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scan root '{path}' does not exist or is not a directory")]
    RootNotFound { path: PathBuf },

    #[error("failed to traverse {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Recursively scan `root` and classify every matching file.
///
/// Sibling order is whatever the filesystem yields; nothing downstream may
/// rely on it.
pub fn scan_tree(root: &Path) -> Result<ScannedFiles, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::RootNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut scanned = ScannedFiles::default();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| ScanError::Walk {
            path: e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf()),
            source: e,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        if is_manifest(&path) {
            scanned.manifests.push(path);
        } else if is_template(&path) && !in_vendored_dir(&path) {
            scanned.templates.push(path);
        }
    }
    Ok(scanned)
}

/// Exact base-name match against [`MANIFEST_FILE_NAME`].
pub fn is_manifest(path: &Path) -> bool {
    path.file_name()
        .map(|name| name == MANIFEST_FILE_NAME)
        .unwrap_or(false)
}

/// Suffix match against [`TEMPLATE_EXTENSIONS`].
pub fn is_template(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| TEMPLATE_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Whether the path passes through a literal [`VENDORED_DIR_NAME`] directory.
pub fn in_vendored_dir(path: &Path) -> bool {
    path.parent()
        .map(|dir| {
            dir.components()
                .any(|c| matches!(c, Component::Normal(name) if name == VENDORED_DIR_NAME))
        })
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
