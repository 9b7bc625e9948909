//! Error types for resolution and deletion.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of a single deletion unit or selection entry.
///
/// These never abort a batch; they are recorded on the outcome of the path
/// that caused them.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeleteError {
    /// Path vanished between selection and deletion.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Directory still has children after its contents were processed.
    #[error("Directory not empty: {path}")]
    DirectoryNotEmpty { path: PathBuf },

    /// Some children of a directory were removed, others were not.
    #[error("Partially deleted {path}: {removed} removed, {failed} failed ({first})")]
    PartialDirectoryFailure {
        path: PathBuf,
        /// Files removed.
        removed: u64,
        /// Files that could not be removed plus subdirectories that could
        /// not be read.
        failed: u64,
        first: Box<DeleteError>,
    },

    /// Not attempted because an earlier entry failed under a stop policy.
    #[error("Skipped after an earlier failure: {path}")]
    Aborted { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {message}")]
    Io { path: PathBuf, message: String },
}

/// Coarse classification of a [`DeleteError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    NotFound,
    PermissionDenied,
    DirectoryNotEmpty,
    PartialDirectoryFailure,
    Aborted,
    Io,
}

impl DeleteError {
    /// Create an error from an I/O failure with path context.
    pub fn io(path: impl Into<PathBuf>, source: &io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            io::ErrorKind::DirectoryNotEmpty => Self::DirectoryNotEmpty { path },
            _ => Self::Io {
                path,
                message: source.to_string(),
            },
        }
    }

    /// The path this error refers to.
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path }
            | Self::PermissionDenied { path }
            | Self::DirectoryNotEmpty { path }
            | Self::PartialDirectoryFailure { path, .. }
            | Self::Aborted { path }
            | Self::Io { path, .. } => path,
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NotFound { .. } => FailureKind::NotFound,
            Self::PermissionDenied { .. } => FailureKind::PermissionDenied,
            Self::DirectoryNotEmpty { .. } => FailureKind::DirectoryNotEmpty,
            Self::PartialDirectoryFailure { .. } => FailureKind::PartialDirectoryFailure,
            Self::Aborted { .. } => FailureKind::Aborted,
            Self::Io { .. } => FailureKind::Io,
        }
    }
}

/// Errors from the per-path file count capability.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path is not a directory.
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ResolveError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Non-fatal problem encountered while counting a directory.
///
/// The affected subtree contributes nothing to the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveWarning {
    /// Path where the walk failed.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
}

impl ResolveWarning {
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Terminal, batch-level errors.
///
/// Distinct from [`DeleteError`]: these stop a batch before any deletion
/// takes place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    /// Nothing was selected.
    #[error("No paths selected")]
    EmptySelection,

    /// A selected path cannot be resolved.
    #[error("Invalid selection {path}: {message}")]
    InvalidSelection { path: PathBuf, message: String },

    /// The confirmation gate declined the batch.
    #[error("Deletion was not confirmed")]
    ConfirmationDeclined,

    /// Another batch is still running.
    #[error("A deletion batch is already in progress")]
    BatchInProgress,

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The background deletion task died.
    #[error("Deletion task failed: {message}")]
    TaskFailed { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_error_io_classification() {
        let err = DeleteError::io(
            "/test/path",
            &io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.kind(), FailureKind::PermissionDenied);
        assert_eq!(err.path(), Path::new("/test/path"));

        let err = DeleteError::io("/gone", &io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, DeleteError::NotFound { .. }));

        let err = DeleteError::io("/busy", &io::Error::other("device busy"));
        match err {
            DeleteError::Io { message, .. } => assert!(message.contains("device busy")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_partial_failure_message_names_first_cause() {
        let err = DeleteError::PartialDirectoryFailure {
            path: PathBuf::from("/data"),
            removed: 4,
            failed: 1,
            first: Box::new(DeleteError::PermissionDenied {
                path: PathBuf::from("/data/locked"),
            }),
        };
        let message = err.to_string();
        assert!(message.contains("4 removed, 1 failed"));
        assert!(message.contains("/data/locked"));
    }

    #[test]
    fn test_resolve_error_io() {
        let err = ResolveError::io(
            "/test/path",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, ResolveError::PermissionDenied { .. }));
    }
}
