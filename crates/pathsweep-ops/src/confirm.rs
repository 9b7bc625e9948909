//! Confirmation gate in front of destructive batches.

use pathsweep_core::{BatchConfig, BatchError, ResolvedSelection};

use crate::batch::BatchRun;
use crate::engine::DeletionRun;
use crate::fs::Filesystem;

/// Decides whether a resolved selection may be deleted.
pub trait ConfirmationGate {
    fn confirm(&mut self, selection: &ResolvedSelection) -> bool;
}

impl<F: FnMut(&ResolvedSelection) -> bool> ConfirmationGate for F {
    fn confirm(&mut self, selection: &ResolvedSelection) -> bool {
        self(selection)
    }
}

/// Gate for non-interactive callers that have already confirmed.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl ConfirmationGate for AlwaysConfirm {
    fn confirm(&mut self, _selection: &ResolvedSelection) -> bool {
        true
    }
}

/// A resolved selection that passed the confirmation gate.
///
/// This is the only input the deletion engine accepts.
#[derive(Debug, Clone)]
pub struct ConfirmedBatch {
    selection: ResolvedSelection,
    config: BatchConfig,
}

impl ConfirmedBatch {
    /// Ask `gate` to approve the deletion of `selection`.
    ///
    /// An invalid `config` or an empty selection is rejected before the
    /// gate is asked.
    pub fn confirm<G: ConfirmationGate + ?Sized>(
        selection: ResolvedSelection,
        config: BatchConfig,
        gate: &mut G,
    ) -> Result<Self, BatchError> {
        config.validate()?;
        if selection.is_empty() {
            return Err(BatchError::EmptySelection);
        }
        if !gate.confirm(&selection) {
            return Err(BatchError::ConfirmationDeclined);
        }
        Ok(Self { selection, config })
    }

    pub fn selection(&self) -> &ResolvedSelection {
        &self.selection
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Run the batch by pulling events, with progress computed alongside.
    pub fn into_run<F: Filesystem>(self, fs: F) -> BatchRun<F> {
        BatchRun::new(self, fs)
    }

    /// Run only the engine, without progress or report.
    pub fn into_deletion_run<F: Filesystem>(self, fs: F) -> DeletionRun<F> {
        DeletionRun::new(fs, self.selection.entries, self.config.failure_policy)
    }

    pub(crate) fn into_parts(self) -> (ResolvedSelection, BatchConfig) {
        (self.selection, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathsweep_core::{DeletionOutcome, SelectionEntry};

    use crate::engine::DeletionEvent;
    use crate::fs::StdFilesystem;

    fn one_file() -> ResolvedSelection {
        ResolvedSelection::new(vec![SelectionEntry::file("/tmp/x")], Vec::new())
    }

    #[test]
    fn test_gate_declines() {
        let result = ConfirmedBatch::confirm(
            one_file(),
            BatchConfig::default(),
            &mut |_: &ResolvedSelection| false,
        );
        assert_eq!(result.unwrap_err(), BatchError::ConfirmationDeclined);
    }

    #[test]
    fn test_gate_sees_selection() {
        let mut seen = 0;
        let batch = ConfirmedBatch::confirm(
            one_file(),
            BatchConfig::default(),
            &mut |s: &ResolvedSelection| {
                seen = s.total;
                true
            },
        )
        .unwrap();
        assert_eq!(seen, 1);
        assert_eq!(batch.selection().len(), 1);
    }

    #[test]
    fn test_empty_selection_is_rejected_before_asking() {
        let mut asked = false;
        let result = ConfirmedBatch::confirm(
            ResolvedSelection::default(),
            BatchConfig::default(),
            &mut |_: &ResolvedSelection| {
                asked = true;
                true
            },
        );
        assert_eq!(result.unwrap_err(), BatchError::EmptySelection);
        assert!(!asked);
    }

    #[test]
    fn test_zero_channel_size_is_rejected_before_asking() {
        let config = BatchConfig {
            channel_size: 0,
            ..Default::default()
        };
        let mut asked = false;
        let result = ConfirmedBatch::confirm(one_file(), config, &mut |_: &ResolvedSelection| {
            asked = true;
            true
        });

        assert!(matches!(result, Err(BatchError::InvalidConfig { .. })));
        assert!(!asked);
    }

    #[test]
    fn test_deletion_run_without_progress() {
        let temp = tempfile::TempDir::new().unwrap();
        let file = temp.path().join("x.txt");
        std::fs::write(&file, "x").unwrap();

        let selection = ResolvedSelection::new(vec![SelectionEntry::file(&file)], Vec::new());
        let batch =
            ConfirmedBatch::confirm(selection, BatchConfig::default(), &mut AlwaysConfirm).unwrap();
        let events: Vec<_> = batch.into_deletion_run(StdFilesystem).collect();

        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            DeletionEvent::Entry(DeletionOutcome::deleted(&file))
        );
        assert!(!file.exists());
    }
}
