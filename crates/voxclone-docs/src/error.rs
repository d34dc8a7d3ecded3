//! Document error types.

use std::path::PathBuf;

/// Errors raised by page counters.
///
/// [`DocumentReader`](crate::DocumentReader) logs these and reports
/// failure as `false`; counters used directly surface them as-is.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Cannot read document {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File does not start with the expected header.
    #[error("{} is not a PDF document", path.display())]
    InvalidMagic { path: PathBuf },

    /// Header was fine but the page structure could not be recovered.
    #[error("Malformed document {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },
}

pub type DocumentResult<T> = Result<T, DocumentError>;
