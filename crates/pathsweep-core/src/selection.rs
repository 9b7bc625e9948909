//! Resolved selection types.

use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::{DeleteError, ResolveWarning};

/// The user's chosen paths: ordered, without duplicates.
///
/// Insertion order is the deletion order. A new pick replaces the whole
/// selection; it is never merged into the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    paths: IndexSet<PathBuf>,
}

impl Selection {
    /// Build a selection, keeping the first occurrence of each path.
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Replace every path with a new pick.
    pub fn replace<I, P>(&mut self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        *self = Self::new(paths);
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for Selection {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Classification of a selected path at resolution time.
#[derive(Debug, Clone, PartialEq, Eq, strum::Display, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[strum(serialize_all = "lowercase")]
pub enum EntryKind {
    /// Regular file, symlink or any other non-directory node.
    File,
    /// Directory; its contained files are the units.
    Directory,
    /// Could not be inspected. Kept so the batch reports it as a failure.
    Inaccessible { cause: DeleteError },
}

impl EntryKind {
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File)
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Directory)
    }

    pub fn is_inaccessible(&self) -> bool {
        matches!(self, Self::Inaccessible { .. })
    }
}

/// A selected path with its classification and unit contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionEntry {
    /// Selected path.
    pub path: PathBuf,
    /// Classification.
    pub kind: EntryKind,
    /// Number of units this entry contributes to the total.
    pub units: u64,
}

impl SelectionEntry {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
            units: 1,
        }
    }

    pub fn directory(path: impl Into<PathBuf>, units: u64) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
            units,
        }
    }

    pub fn inaccessible(path: impl Into<PathBuf>, cause: DeleteError) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Inaccessible { cause },
            units: 0,
        }
    }
}

/// A selection after classification and unit counting.
///
/// Entry order is the deletion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSelection {
    /// Tagged entries in selection order.
    pub entries: Vec<SelectionEntry>,
    /// Sum of every entry's units.
    pub total: u64,
    /// Subtrees that could not be counted and paths dropped because a
    /// selected directory already contains them.
    #[serde(default)]
    pub warnings: Vec<ResolveWarning>,
}

impl ResolvedSelection {
    /// Build a resolved selection, computing the total from the entries.
    pub fn new(entries: Vec<SelectionEntry>, warnings: Vec<ResolveWarning>) -> Self {
        let total = entries.iter().map(|e| e.units).sum();
        Self {
            entries,
            total,
            warnings,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectionEntry> {
        self.entries.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(|e| e.path.as_path())
    }

    /// Entries that could not be inspected during resolution.
    pub fn inaccessible(&self) -> impl Iterator<Item = &SelectionEntry> {
        self.entries.iter().filter(|e| e.kind.is_inaccessible())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_dedups_in_order() {
        let selection = Selection::new(["/b", "/a", "/b", "/c", "/a"]);
        let paths: Vec<_> = selection.iter().collect();
        assert_eq!(
            paths,
            vec![Path::new("/b"), Path::new("/a"), Path::new("/c")]
        );
    }

    #[test]
    fn test_selection_replace_is_wholesale() {
        let mut selection = Selection::new(["/a", "/b"]);
        selection.replace(["/c"]);
        assert_eq!(selection.len(), 1);
        assert!(selection.contains(Path::new("/c")));
        assert!(!selection.contains(Path::new("/a")));
    }

    #[test]
    fn test_total_sums_units() {
        let resolved = ResolvedSelection::new(
            vec![
                SelectionEntry::file("/a"),
                SelectionEntry::directory("/b", 7),
                SelectionEntry::directory("/empty", 0),
                SelectionEntry::inaccessible(
                    "/c",
                    DeleteError::NotFound {
                        path: PathBuf::from("/c"),
                    },
                ),
            ],
            Vec::new(),
        );

        assert_eq!(resolved.total, 8);
        assert_eq!(resolved.len(), 4);
        assert_eq!(resolved.inaccessible().count(), 1);
    }

    #[test]
    fn test_entry_kind_display() {
        assert_eq!(EntryKind::File.to_string(), "file");
        assert_eq!(EntryKind::Directory.to_string(), "directory");
    }

    #[test]
    fn test_entry_kind_predicates() {
        let file = SelectionEntry::file("/a");
        assert!(file.kind.is_file());
        assert!(!file.kind.is_dir());

        let dir = SelectionEntry::directory("/b", 2);
        assert!(dir.kind.is_dir());
        assert!(!dir.kind.is_file());

        let gone = SelectionEntry::inaccessible(
            "/c",
            DeleteError::NotFound {
                path: PathBuf::from("/c"),
            },
        );
        assert!(gone.kind.is_inaccessible());
        assert!(!gone.kind.is_file() && !gone.kind.is_dir());
        assert_eq!(gone.units, 0);
    }
}
