//! Batch execution: pull-based iteration and push-based channel delivery.
//!
//! Both adapters drive the same [`BatchRun`], so they produce identical
//! event sequences for the same filesystem state.

use std::collections::VecDeque;

use tokio::sync::mpsc;
use tracing::info;

use pathsweep_core::{BatchError, DeletionOutcome, ProgressState, UnitRecord};

use crate::confirm::ConfirmedBatch;
use crate::engine::{DeletionEvent, DeletionRun};
use crate::fs::Filesystem;
use crate::progress::ProgressTracker;
use crate::report::{BatchReport, ReportBuilder};

/// Event observed while a batch runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    /// Percentage complete. Informational only, never a completion signal.
    Progress(u8),
    /// A leaf unit was attempted.
    Unit(UnitRecord),
    /// A selected path is finished.
    Outcome(DeletionOutcome),
    /// The batch is over. Always the last event.
    Complete(BatchReport),
}

/// A batch driven by the caller, one event at a time.
pub struct BatchRun<F> {
    run: DeletionRun<F>,
    tracker: ProgressTracker,
    report: ReportBuilder,
    queue: VecDeque<BatchEvent>,
    done: bool,
}

impl<F: Filesystem> BatchRun<F> {
    pub(crate) fn new(batch: ConfirmedBatch, fs: F) -> Self {
        let (selection, config) = batch.into_parts();
        let total = selection.total;
        info!(
            entries = selection.len(),
            total,
            policy = %config.failure_policy,
            "starting deletion batch"
        );

        let mut tracker = ProgressTracker::new(total);
        let mut queue = VecDeque::new();
        queue.push_back(BatchEvent::Progress(tracker.begin()));

        Self {
            run: DeletionRun::new(fs, selection.entries, config.failure_policy),
            tracker,
            report: ReportBuilder::new(total),
            queue,
            done: false,
        }
    }

    /// Current progress of this batch.
    pub fn progress(&self) -> ProgressState {
        self.tracker.state()
    }

    fn pump(&mut self) {
        match self.run.next() {
            Some(DeletionEvent::Unit(unit)) => {
                self.report.record_unit(&unit);
                self.queue.push_back(BatchEvent::Unit(unit));
                if let Some(value) = self.tracker.record_unit() {
                    self.queue.push_back(BatchEvent::Progress(value));
                }
            }
            Some(DeletionEvent::Entry(outcome)) => {
                self.report.record_outcome(&outcome);
                self.queue.push_back(BatchEvent::Outcome(outcome));
            }
            None => {
                if let Some(value) = self.tracker.finish() {
                    self.queue.push_back(BatchEvent::Progress(value));
                }
                let report = std::mem::take(&mut self.report).finish();
                info!(summary = %report.summary(), "deletion batch complete");
                self.queue.push_back(BatchEvent::Complete(report));
                self.done = true;
            }
        }
    }
}

impl<F: Filesystem> Iterator for BatchRun<F> {
    type Item = BatchEvent;

    fn next(&mut self) -> Option<BatchEvent> {
        while self.queue.is_empty() && !self.done {
            self.pump();
        }
        self.queue.pop_front()
    }
}

/// Start a batch on a blocking worker and deliver its events over a channel.
///
/// The receiver closes right after [`BatchEvent::Complete`]. Dropping it
/// does not stop the deletion.
///
/// # Panics
///
/// Panics if called outside a Tokio runtime.
pub fn start_batch<F>(batch: ConfirmedBatch, fs: F) -> mpsc::Receiver<BatchEvent>
where
    F: Filesystem + 'static,
{
    let (tx, rx) = mpsc::channel(batch.config().channel_size);

    tokio::task::spawn_blocking(move || {
        for event in batch.into_run(fs) {
            let _ = tx.blocking_send(event);
        }
    });

    rx
}

/// Run a batch in the background, passing every event to `on_event`.
///
/// Returns the final report, or [`BatchError::TaskFailed`] if the worker
/// stopped before completing.
pub async fn run_batch<F, H>(
    batch: ConfirmedBatch,
    fs: F,
    mut on_event: H,
) -> Result<BatchReport, BatchError>
where
    F: Filesystem + 'static,
    H: FnMut(&BatchEvent),
{
    let mut rx = start_batch(batch, fs);

    while let Some(event) = rx.recv().await {
        on_event(&event);
        if let BatchEvent::Complete(report) = event {
            return Ok(report);
        }
    }

    Err(BatchError::TaskFailed {
        message: "deletion worker exited without completing".to_string(),
    })
}
