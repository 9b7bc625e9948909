//! Selection resolution.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use pathsweep_core::{
    BatchConfig, BatchError, DeleteError, ResolveError, ResolveWarning, ResolvedSelection,
    Selection, SelectionEntry,
};

use crate::counter::{FileCounter, JwalkCounter};

/// Classifies selected paths and counts their deletable units.
#[derive(Debug, Clone)]
pub struct SelectionResolver<C = JwalkCounter> {
    counter: C,
    require_absolute: bool,
}

impl SelectionResolver<JwalkCounter> {
    /// Create a resolver with the default jwalk counter.
    pub fn new() -> Self {
        Self::with_counter(JwalkCounter::new())
    }

    /// Create a resolver from batch settings.
    pub fn from_config(config: &BatchConfig) -> Self {
        Self {
            counter: JwalkCounter::with_threads(config.threads),
            require_absolute: config.require_absolute,
        }
    }
}

impl Default for SelectionResolver<JwalkCounter> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: FileCounter> SelectionResolver<C> {
    /// Create a resolver with a custom counter.
    pub fn with_counter(counter: C) -> Self {
        Self {
            counter,
            require_absolute: true,
        }
    }

    /// Accept or reject relative paths.
    pub fn require_absolute(mut self, require: bool) -> Self {
        self.require_absolute = require;
        self
    }

    /// Resolve a selection into tagged entries and a unit total.
    ///
    /// Only fails when the selection itself is invalid. Paths that cannot
    /// be inspected are kept as inaccessible entries, and unreadable
    /// subtrees contribute zero units. A path inside another selected
    /// directory is dropped with a warning, since deleting that directory
    /// removes it.
    pub fn resolve(&self, selection: &Selection) -> Result<ResolvedSelection, BatchError> {
        let mut entries = Vec::with_capacity(selection.len());
        let mut warnings = Vec::new();

        for path in selection.iter() {
            if self.require_absolute && !path.is_absolute() {
                return Err(BatchError::InvalidSelection {
                    path: path.to_path_buf(),
                    message: "path must be absolute".to_string(),
                });
            }

            if let Some(ancestor) = covering_ancestor(selection, path) {
                debug!(
                    path = %path.display(),
                    ancestor = %ancestor.display(),
                    "already covered by a selected directory"
                );
                warnings.push(ResolveWarning::new(
                    path,
                    format!("inside selected directory {}", ancestor.display()),
                ));
                continue;
            }

            let entry = match fs::symlink_metadata(path) {
                Ok(metadata) if metadata.is_dir() => {
                    let units = match self.counter.count_files(path) {
                        Ok(count) => {
                            warnings.extend(count.warnings);
                            count.files
                        }
                        Err(err) => {
                            warnings.push(ResolveWarning::new(path, err.to_string()));
                            0
                        }
                    };
                    SelectionEntry::directory(path, units)
                }
                Ok(_) => SelectionEntry::file(path),
                Err(err) => SelectionEntry::inaccessible(path, DeleteError::io(path, &err)),
            };

            debug!(path = %path.display(), kind = %entry.kind, units = entry.units, "resolved");
            entries.push(entry);
        }

        let resolved = ResolvedSelection::new(entries, warnings);
        info!(
            entries = resolved.len(),
            total = resolved.total,
            warnings = resolved.warnings.len(),
            "selection resolved"
        );
        Ok(resolved)
    }

    /// Count the files below a single directory.
    pub fn count_files(&self, dir: &Path) -> Result<u64, ResolveError> {
        self.counter.count_files(dir).map(|count| count.files)
    }
}

/// The nearest selected directory that already contains `path`.
///
/// Every ancestor up to it must be a real directory: a path reached through
/// a symlink is not removed along with the directory holding the link.
fn covering_ancestor<'a>(selection: &Selection, path: &'a Path) -> Option<&'a Path> {
    let selected = path.ancestors().skip(1).find(|a| selection.contains(a))?;
    path.ancestors()
        .skip(1)
        .take_while(|a| *a != selected)
        .chain(std::iter::once(selected))
        .all(|a| fs::symlink_metadata(a).is_ok_and(|m| m.is_dir()))
        .then_some(selected)
}
