//! Batch report: the audit trail of one deletion batch.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pathsweep_core::{DeleteError, DeletionOutcome, UnitRecord};

/// Result of a completed batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Units counted at resolution.
    pub total_units: u64,
    /// Units removed.
    pub units_removed: u64,
    /// Units that could not be removed.
    pub units_failed: u64,
    /// One outcome per selected path, in selection order.
    pub outcomes: Vec<DeletionOutcome>,
    /// Every unit that could not be removed.
    pub failed_units: Vec<UnitRecord>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchReport {
    /// Number of paths deleted.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_deleted()).count()
    }

    /// Number of paths that failed.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Check if every selected path was deleted.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Units attempted, removed or not.
    pub fn units_attempted(&self) -> u64 {
        self.units_removed + self.units_failed
    }

    /// Failed paths with their causes.
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &DeleteError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.cause().map(|cause| (o.path.as_path(), cause)))
    }

    /// Get a human-readable summary of the batch.
    pub fn summary(&self) -> String {
        let noun = |n: usize| if n == 1 { "item" } else { "items" };
        let succeeded = self.succeeded();
        if self.is_success() {
            format!("Deleted {} {}", succeeded, noun(succeeded))
        } else {
            format!(
                "Deleted {} {}, {} failed",
                succeeded,
                noun(succeeded),
                self.failed()
            )
        }
    }
}

/// Accumulates a [`BatchReport`] while a batch runs.
#[derive(Debug, Default)]
pub(crate) struct ReportBuilder {
    total_units: u64,
    units_removed: u64,
    units_failed: u64,
    outcomes: Vec<DeletionOutcome>,
    failed_units: Vec<UnitRecord>,
    started_at: DateTime<Utc>,
}

impl ReportBuilder {
    pub fn new(total_units: u64) -> Self {
        Self {
            total_units,
            started_at: Utc::now(),
            ..Default::default()
        }
    }

    pub fn record_unit(&mut self, unit: &UnitRecord) {
        if unit.is_removed() {
            self.units_removed += 1;
        } else {
            self.units_failed += 1;
            self.failed_units.push(unit.clone());
        }
    }

    pub fn record_outcome(&mut self, outcome: &DeletionOutcome) {
        self.outcomes.push(outcome.clone());
    }

    pub fn finish(self) -> BatchReport {
        BatchReport {
            total_units: self.total_units,
            units_removed: self.units_removed,
            units_failed: self.units_failed,
            outcomes: self.outcomes,
            failed_units: self.failed_units,
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn report(outcomes: Vec<DeletionOutcome>) -> BatchReport {
        let mut builder = ReportBuilder::new(outcomes.len() as u64);
        for outcome in &outcomes {
            builder.record_outcome(outcome);
        }
        builder.finish()
    }

    #[test]
    fn test_summary_success() {
        let report = report(vec![
            DeletionOutcome::deleted("/a"),
            DeletionOutcome::deleted("/b"),
        ]);
        assert!(report.is_success());
        assert_eq!(report.summary(), "Deleted 2 items");
    }

    #[test]
    fn test_summary_and_failures() {
        let report = report(vec![
            DeletionOutcome::deleted("/a"),
            DeletionOutcome::failed(
                "/b",
                DeleteError::NotFound {
                    path: PathBuf::from("/b"),
                },
            ),
        ]);
        assert_eq!(report.summary(), "Deleted 1 item, 1 failed");

        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, Path::new("/b"));
    }

    #[test]
    fn test_unit_counters() {
        let mut builder = ReportBuilder::new(3);
        builder.record_unit(&UnitRecord::removed("/d/a"));
        builder.record_unit(&UnitRecord::failed(
            "/d/b",
            DeleteError::PermissionDenied {
                path: PathBuf::from("/d/b"),
            },
        ));
        let report = builder.finish();

        assert_eq!(report.units_attempted(), 2);
        assert_eq!(report.units_removed, 1);
        assert_eq!(report.failed_units.len(), 1);
        assert!(report.finished_at >= report.started_at);
    }
}
