//! Error types for ttsync-engine.

use std::path::PathBuf;

use thiserror::Error;

use ttsync_scanner::ScanError;

/// All errors that can arise from engine operations.
///
/// Only [`EngineError::Scan`] is fatal for a whole run; per-template I/O
/// errors are caught by the aggregator and downgraded to run warnings.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Tree scan failure — the root is missing or not traversable.
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`EngineError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> EngineError {
    EngineError::Io {
        path: path.into(),
        source,
    }
}
