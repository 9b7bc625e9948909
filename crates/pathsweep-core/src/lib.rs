//! Core types for pathsweep.
//!
//! This crate provides the data model shared by the selection resolver and
//! the deletion engine: tagged selection entries, per-path outcomes, progress
//! state, batch configuration and the error taxonomy.

mod config;
mod error;
mod outcome;
mod progress;
mod selection;

pub use config::{BatchConfig, BatchConfigBuilder, FailurePolicy};
pub use error::{BatchError, DeleteError, FailureKind, ResolveError, ResolveWarning};
pub use outcome::{DeletionOutcome, OutcomeStatus, UnitRecord};
pub use progress::{ProgressMode, ProgressState};
pub use selection::{EntryKind, ResolvedSelection, Selection, SelectionEntry};
