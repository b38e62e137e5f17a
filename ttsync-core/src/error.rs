//! Error types for ttsync-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from parsing a package manifest.
///
/// A manifest failure isolates that one project: its key is simply absent
/// from the reference index and the run continues.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Underlying I/O failure (file not found, permission denied, etc.).
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// XML parse error on load — includes file path and position context.
    #[error("failed to parse manifest at {path}: {source}")]
    Xml {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    /// A `package` element lacks one of its required attributes.
    #[error("package element in {path} is missing its '{attribute}' attribute")]
    MissingAttribute {
        path: PathBuf,
        attribute: &'static str,
    },
}

/// Convenience constructor for [`ManifestError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ManifestError {
    ManifestError::Io {
        path: path.into(),
        source,
    }
}
