//! Deletion engine for pathsweep.
//!
//! This crate deletes a confirmed selection of files and directories as one
//! batch, reporting progress as it goes and recording a per-path outcome for
//! every entry, whether it was deleted or not.
//!
//! A batch can be consumed two ways, with identical results:
//!
//! - **Pull**: [`ConfirmedBatch::into_run`] returns an iterator of
//!   [`BatchEvent`]s that the caller drives.
//! - **Push**: [`start_batch`] runs the same iterator on a blocking tokio
//!   worker and delivers the events over a channel.
//!
//! [`Orchestrator`] wraps both with explicit selection and progress state
//! and notifies [`BatchListener`]s.

mod batch;
mod confirm;
mod engine;
mod fs;
mod orchestrator;
mod progress;
mod report;

pub use batch::{BatchEvent, BatchRun, run_batch, start_batch};
pub use confirm::{AlwaysConfirm, ConfirmationGate, ConfirmedBatch};
pub use engine::{DeletionEvent, DeletionRun};
pub use fs::{DirChild, Filesystem, StdFilesystem};
pub use orchestrator::{BatchListener, Orchestrator};
pub use progress::{ProgressTracker, Track, percentage, track};
pub use report::BatchReport;

// Re-export core types for convenience
pub use pathsweep_core::{
    BatchConfig, BatchError, DeleteError, DeletionOutcome, EntryKind, FailureKind, FailurePolicy,
    OutcomeStatus, ProgressMode, ProgressState, ResolvedSelection, Selection, SelectionEntry,
    UnitRecord,
};
pub use pathsweep_scan::{FileCounter, JwalkCounter, SelectionResolver};
