//! Stateful front end for selection, confirmation and deletion.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use pathsweep_core::{
    BatchConfig, BatchError, DeletionOutcome, ProgressMode, ProgressState, ResolvedSelection,
    Selection, UnitRecord,
};
use pathsweep_scan::{FileCounter, JwalkCounter, SelectionResolver};

use crate::batch::BatchEvent;
use crate::confirm::{ConfirmationGate, ConfirmedBatch};
use crate::fs::{Filesystem, StdFilesystem};
use crate::report::BatchReport;

/// Observer of a running batch.
///
/// Every method has an empty default so listeners pick what they need.
pub trait BatchListener: Send {
    fn on_progress(&mut self, _value: u8) {}
    fn on_unit(&mut self, _unit: &UnitRecord) {}
    fn on_outcome(&mut self, _outcome: &DeletionOutcome) {}
    fn on_complete(&mut self, _report: &BatchReport) {}
}

/// Owns the current selection and progress state.
///
/// Presentation layers read state through accessors and subscribe with
/// [`BatchListener`]s; they never write it directly.
pub struct Orchestrator<F = StdFilesystem, C = JwalkCounter> {
    fs: Arc<F>,
    resolver: SelectionResolver<C>,
    config: BatchConfig,
    selection: Selection,
    resolved: Option<ResolvedSelection>,
    progress: ProgressState,
    last_report: Option<BatchReport>,
    listeners: Vec<Box<dyn BatchListener>>,
}

impl Orchestrator {
    /// Create an orchestrator over the real filesystem.
    pub fn new(config: BatchConfig) -> Self {
        let resolver = SelectionResolver::from_config(&config);
        Self::with_parts(StdFilesystem, resolver, config)
    }
}

impl<F: Filesystem, C: FileCounter> Orchestrator<F, C> {
    /// Create an orchestrator from its collaborators.
    pub fn with_parts(fs: F, resolver: SelectionResolver<C>, config: BatchConfig) -> Self {
        Self {
            fs: Arc::new(fs),
            resolver,
            config,
            selection: Selection::default(),
            resolved: None,
            progress: ProgressState::default(),
            last_report: None,
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn BatchListener>) {
        self.listeners.push(listener);
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Resolution of the current selection, if it is up to date.
    pub fn resolved(&self) -> Option<&ResolvedSelection> {
        self.resolved.as_ref()
    }

    pub fn progress(&self) -> ProgressState {
        self.progress
    }

    pub fn last_report(&self) -> Option<&BatchReport> {
        self.last_report.as_ref()
    }

    /// Shared handle to the filesystem, for running a batch elsewhere.
    pub fn filesystem(&self) -> Arc<F> {
        Arc::clone(&self.fs)
    }

    /// Replace the selection with a new pick and resolve it.
    pub fn select<I, P>(&mut self, paths: I) -> Result<&ResolvedSelection, BatchError>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.ensure_idle()?;
        self.selection.replace(paths);
        self.refresh()
    }

    /// Resolve the current selection again.
    pub fn refresh(&mut self) -> Result<&ResolvedSelection, BatchError> {
        self.resolved = None;
        let resolved = self.resolver.resolve(&self.selection)?;
        Ok(self.resolved.insert(resolved))
    }

    pub fn clear_selection(&mut self) -> Result<(), BatchError> {
        self.ensure_idle()?;
        self.selection.clear();
        self.resolved = None;
        Ok(())
    }

    /// Resolve and confirm the current selection, entering the running state.
    ///
    /// Feed every event of the returned batch back through
    /// [`Orchestrator::handle_event`], or call [`Orchestrator::abort_batch`]
    /// if the events stop arriving.
    pub fn begin_batch<G>(&mut self, gate: &mut G) -> Result<ConfirmedBatch, BatchError>
    where
        G: ConfirmationGate + ?Sized,
    {
        self.ensure_idle()?;
        if self.selection.is_empty() {
            return Err(BatchError::EmptySelection);
        }

        let resolved = self.refresh()?.clone();
        let batch = ConfirmedBatch::confirm(resolved, self.config.clone(), gate)?;
        self.progress = ProgressState {
            value: 0,
            mode: ProgressMode::InProgress,
        };
        Ok(batch)
    }

    /// Delete the current selection, driving the batch on this thread.
    pub fn delete_selected<G>(&mut self, gate: &mut G) -> Result<BatchReport, BatchError>
    where
        G: ConfirmationGate + ?Sized,
    {
        let batch = self.begin_batch(gate)?;
        let mut report = None;

        for event in batch.into_run(Arc::clone(&self.fs)) {
            self.handle_event(&event);
            if let BatchEvent::Complete(done) = event {
                report = Some(done);
            }
        }

        report.ok_or_else(|| {
            self.abort_batch();
            BatchError::TaskFailed {
                message: "batch ended without a report".to_string(),
            }
        })
    }

    /// Apply one batch event to the owned state and notify listeners.
    pub fn handle_event(&mut self, event: &BatchEvent) {
        match event {
            BatchEvent::Progress(value) => {
                self.progress.value = *value;
                for listener in &mut self.listeners {
                    listener.on_progress(*value);
                }
            }
            BatchEvent::Unit(unit) => {
                for listener in &mut self.listeners {
                    listener.on_unit(unit);
                }
            }
            BatchEvent::Outcome(outcome) => {
                for listener in &mut self.listeners {
                    listener.on_outcome(outcome);
                }
            }
            BatchEvent::Complete(report) => {
                self.complete(report);
                for listener in &mut self.listeners {
                    listener.on_complete(report);
                }
            }
        }
    }

    /// Return to idle after a batch whose events stopped early.
    pub fn abort_batch(&mut self) {
        self.progress = ProgressState::default();
    }

    fn complete(&mut self, report: &BatchReport) {
        self.progress = ProgressState::default();
        self.resolved = None;

        if report.is_success() {
            self.selection.clear();
        } else {
            // Keep what remains so the caller can retry it.
            let failed: Vec<PathBuf> = report.failures().map(|(p, _)| p.to_path_buf()).collect();
            debug!(remaining = failed.len(), "keeping failed paths selected");
            self.selection.replace(failed);
        }

        self.last_report = Some(report.clone());
    }

    fn ensure_idle(&self) -> Result<(), BatchError> {
        if self.progress.is_running() {
            return Err(BatchError::BatchInProgress);
        }
        Ok(())
    }
}
