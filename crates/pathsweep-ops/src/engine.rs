//! Sequential deletion engine.
//!
//! [`DeletionRun`] is a lazy iterator: each call to `next` performs at most
//! one unlink before yielding, so callers observe progress while a large
//! tree is being removed.

use std::path::PathBuf;
use std::vec;

use tracing::{debug, warn};

use pathsweep_core::{
    DeleteError, DeletionOutcome, EntryKind, FailurePolicy, SelectionEntry, UnitRecord,
};

use crate::fs::{DirChild, Filesystem};

/// Item produced by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionEvent {
    /// A leaf unit was attempted.
    Unit(UnitRecord),
    /// A selected path is finished. Exactly one per entry, in selection order.
    Entry(DeletionOutcome),
}

/// An in-flight deletion of a batch of entries.
///
/// Finite and not restartable: the entries are consumed as they are deleted.
pub struct DeletionRun<F> {
    fs: F,
    entries: vec::IntoIter<SelectionEntry>,
    policy: FailurePolicy,
    current: Option<DirectoryJob>,
    pending: Option<DeletionOutcome>,
    aborted: bool,
}

impl<F: Filesystem> DeletionRun<F> {
    pub(crate) fn new(fs: F, entries: Vec<SelectionEntry>, policy: FailurePolicy) -> Self {
        Self {
            fs,
            entries: entries.into_iter(),
            policy,
            current: None,
            pending: None,
            aborted: false,
        }
    }

    /// Number of entries that have not been started yet.
    pub fn remaining_entries(&self) -> usize {
        self.entries.len()
    }

    fn finish_entry(&mut self, outcome: DeletionOutcome) -> DeletionEvent {
        match outcome.cause() {
            None => debug!(path = %outcome.path.display(), "deleted"),
            Some(cause) => {
                warn!(path = %outcome.path.display(), error = %cause, "deletion failed");
                if self.policy == FailurePolicy::StopOnFirstFailure {
                    self.aborted = true;
                }
            }
        }
        DeletionEvent::Entry(outcome)
    }

    /// Remove a single non-directory entry, queueing its outcome.
    fn delete_file(&mut self, path: PathBuf) -> DeletionEvent {
        let unit = match self.fs.remove_file(&path) {
            Ok(()) => UnitRecord::removed(&path),
            Err(err) => UnitRecord::failed(&path, DeleteError::io(&path, &err)),
        };
        self.pending = Some(match &unit.error {
            None => DeletionOutcome::deleted(path),
            Some(err) => DeletionOutcome::failed(path, err.clone()),
        });
        DeletionEvent::Unit(unit)
    }

    fn start_entry(&mut self, entry: SelectionEntry) -> Option<DeletionEvent> {
        if self.aborted {
            let cause = DeleteError::Aborted {
                path: entry.path.clone(),
            };
            return Some(DeletionEvent::Entry(DeletionOutcome::failed(
                entry.path, cause,
            )));
        }

        let counts_as_unit = match entry.kind {
            EntryKind::Inaccessible { cause } => {
                return Some(self.finish_entry(DeletionOutcome::failed(entry.path, cause)));
            }
            EntryKind::File => true,
            EntryKind::Directory => false,
        };

        // Re-check: the path may have changed since resolution.
        match self.fs.is_dir(&entry.path) {
            Ok(true) => {
                self.current = Some(DirectoryJob::start(&self.fs, entry.path));
                None
            }
            Ok(false) => Some(self.delete_file(entry.path)),
            Err(err) => {
                let cause = DeleteError::io(&entry.path, &err);
                if counts_as_unit {
                    self.pending = Some(DeletionOutcome::failed(&entry.path, cause.clone()));
                    Some(DeletionEvent::Unit(UnitRecord::failed(entry.path, cause)))
                } else {
                    Some(self.finish_entry(DeletionOutcome::failed(entry.path, cause)))
                }
            }
        }
    }
}

impl<F: Filesystem> Iterator for DeletionRun<F> {
    type Item = DeletionEvent;

    fn next(&mut self) -> Option<DeletionEvent> {
        loop {
            if let Some(outcome) = self.pending.take() {
                return Some(self.finish_entry(outcome));
            }

            if let Some(mut job) = self.current.take() {
                match job.step(&self.fs) {
                    Some(unit) => {
                        self.current = Some(job);
                        return Some(DeletionEvent::Unit(unit));
                    }
                    None => return Some(self.finish_entry(job.into_outcome())),
                }
            }

            let entry = self.entries.next()?;
            if let Some(event) = self.start_entry(entry) {
                return Some(event);
            }
        }
    }
}

/// A directory being removed bottom-up.
struct DirectoryJob {
    root: PathBuf,
    stack: Vec<Frame>,
    removed: u64,
    failed: u64,
    first_error: Option<DeleteError>,
}

struct Frame {
    dir: PathBuf,
    children: vec::IntoIter<DirChild>,
}

impl DirectoryJob {
    fn start(fs: &impl Filesystem, root: PathBuf) -> Self {
        let mut job = Self {
            root: root.clone(),
            stack: Vec::new(),
            removed: 0,
            failed: 0,
            first_error: None,
        };
        job.descend(fs, root);
        job
    }

    fn descend(&mut self, fs: &impl Filesystem, dir: PathBuf) {
        match fs.read_dir(&dir) {
            Ok(mut children) => {
                children.sort_by(|a, b| a.path.cmp(&b.path));
                self.stack.push(Frame {
                    dir,
                    children: children.into_iter(),
                });
            }
            Err(err) => {
                let cause = DeleteError::io(&dir, &err);
                warn!(path = %dir.display(), error = %cause, "cannot read directory");
                self.failed += 1;
                self.note(cause);
            }
        }
    }

    fn note(&mut self, cause: DeleteError) {
        if self.first_error.is_none() {
            self.first_error = Some(cause);
        }
    }

    /// Advance until one unit has been attempted or the tree is done.
    fn step(&mut self, fs: &impl Filesystem) -> Option<UnitRecord> {
        loop {
            let frame = self.stack.last_mut()?;
            match frame.children.next() {
                Some(child) if child.is_dir => self.descend(fs, child.path),
                Some(child) => {
                    return Some(match fs.remove_file(&child.path) {
                        Ok(()) => {
                            self.removed += 1;
                            UnitRecord::removed(child.path)
                        }
                        Err(err) => {
                            let cause = DeleteError::io(&child.path, &err);
                            self.failed += 1;
                            self.note(cause.clone());
                            UnitRecord::failed(child.path, cause)
                        }
                    });
                }
                None => {
                    let dir = self.stack.pop()?.dir;
                    if let Err(err) = fs.remove_dir(&dir) {
                        self.note(DeleteError::io(&dir, &err));
                    }
                }
            }
        }
    }

    fn into_outcome(self) -> DeletionOutcome {
        match self.first_error {
            None => DeletionOutcome::deleted(self.root),
            Some(first) if self.removed > 0 => {
                let cause = DeleteError::PartialDirectoryFailure {
                    path: self.root.clone(),
                    removed: self.removed,
                    failed: self.failed,
                    first: Box::new(first),
                };
                DeletionOutcome::failed(self.root, cause)
            }
            Some(first) => DeletionOutcome::failed(self.root, first),
        }
    }
}
