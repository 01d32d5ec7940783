//! Error types for scanning, querying and launching.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, MatchError>;

#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// The selected root is missing, unreadable or not a directory.
    /// Raised before any scanning work begins.
    #[error("Invalid directory {}: {reason}", .path.display())]
    InvalidDirectory { path: PathBuf, reason: String },

    /// Per-file and non-fatal: the scan records a size of 0 and continues.
    #[error("Could not read size of {}: {source}", .path.display())]
    FileSizeUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The operating system refused to open a file or folder.
    #[error("Could not open {}: {message}", .path.display())]
    OpenFailed { path: PathBuf, message: String },

    #[error("Scan cancelled")]
    Cancelled,

    #[error("Invalid exclude pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl MatchError {
    pub(crate) fn invalid_directory(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidDirectory {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn open_failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::OpenFailed {
            path: path.into(),
            message: message.into(),
        }
    }
}
