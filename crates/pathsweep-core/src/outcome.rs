//! Deletion outcome records.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::DeleteError;

/// Result of one deletion attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "cause", rename_all = "snake_case")]
pub enum OutcomeStatus {
    Deleted,
    Failed(DeleteError),
}

/// Outcome of one selected path. Produced once, never overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionOutcome {
    /// The selected path.
    pub path: PathBuf,
    /// Whether it is gone.
    pub status: OutcomeStatus,
}

impl DeletionOutcome {
    pub fn deleted(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            status: OutcomeStatus::Deleted,
        }
    }

    pub fn failed(path: impl Into<PathBuf>, cause: DeleteError) -> Self {
        Self {
            path: path.into(),
            status: OutcomeStatus::Failed(cause),
        }
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self.status, OutcomeStatus::Deleted)
    }

    /// The failure cause, if any.
    pub fn cause(&self) -> Option<&DeleteError> {
        match &self.status {
            OutcomeStatus::Deleted => None,
            OutcomeStatus::Failed(cause) => Some(cause),
        }
    }
}

/// A single leaf unit (file or symlink) that was attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    /// Path of the unit.
    pub path: PathBuf,
    /// Failure, if the unit could not be removed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<DeleteError>,
}

impl UnitRecord {
    pub fn removed(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            error: None,
        }
    }

    pub fn failed(path: impl Into<PathBuf>, error: DeleteError) -> Self {
        Self {
            path: path.into(),
            error: Some(error),
        }
    }

    pub fn is_removed(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_cause() {
        let ok = DeletionOutcome::deleted("/a");
        assert!(ok.is_deleted());
        assert!(ok.cause().is_none());

        let err = DeletionOutcome::failed(
            "/b",
            DeleteError::NotFound {
                path: PathBuf::from("/b"),
            },
        );
        assert!(!err.is_deleted());
        assert!(matches!(err.cause(), Some(DeleteError::NotFound { .. })));
    }

    #[test]
    fn test_outcome_json_shape() {
        let outcome = DeletionOutcome::failed(
            "/b",
            DeleteError::PermissionDenied {
                path: PathBuf::from("/b"),
            },
        );
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"]["status"], "failed");
        assert_eq!(json["status"]["cause"]["kind"], "permission_denied");
    }
}
