//! Error taxonomy for the manifest update routine.
//!
//! Every variant names the step that failed and the URL or path involved, so the
//! CLI can print the error as-is.

use crate::fetch::FetchError;
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, UpdateError>;

#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    /// Bad or missing URL template, empty version, unusable field pointer.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Download failed: connection, bad status, interrupted transfer.
    #[error("network error: {0}")]
    Network(FetchError),

    /// Local file read/write failure.
    #[error("I/O error: {context} {}: {cause}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        cause: std::io::Error,
    },

    /// Manifest missing, not valid JSON, or missing the object a field lives in.
    #[error("manifest error: {}: {reason}", .path.display())]
    Manifest { path: PathBuf, reason: String },
}

impl UpdateError {
    pub(crate) fn io(context: &'static str, path: &Path, cause: std::io::Error) -> Self {
        UpdateError::Io {
            context,
            path: path.to_path_buf(),
            cause,
        }
    }

    pub(crate) fn manifest(path: &Path, reason: impl Into<String>) -> Self {
        UpdateError::Manifest {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// A storage failure while streaming the body is a local I/O problem on
    /// `dest`; everything else the fetcher reports is network.
    pub(crate) fn from_fetch(e: FetchError, dest: &Path) -> Self {
        match e {
            FetchError::Storage { source } => UpdateError::io("writing download to", dest, source),
            other => UpdateError::Network(other),
        }
    }
}
