//! Filesystem primitives used by the deletion engine.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A child of a directory being deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirChild {
    pub path: PathBuf,
    /// True only for real directories; symlinks are never reported as directories.
    pub is_dir: bool,
}

/// Raw filesystem operations the engine is built on.
///
/// None of these follow symbolic links.
pub trait Filesystem: Send + Sync {
    /// Whether `path` is a directory (not a link to one).
    fn is_dir(&self, path: &Path) -> io::Result<bool>;

    /// List the direct children of a directory.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirChild>>;

    /// Remove a file, symlink or other non-directory node.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Remove an empty directory.
    fn remove_dir(&self, path: &Path) -> io::Result<()>;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFilesystem;

impl Filesystem for StdFilesystem {
    fn is_dir(&self, path: &Path) -> io::Result<bool> {
        Ok(fs::symlink_metadata(path)?.is_dir())
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirChild>> {
        fs::read_dir(path)?
            .map(|entry| {
                let entry = entry?;
                Ok(DirChild {
                    is_dir: entry.file_type()?.is_dir(),
                    path: entry.path(),
                })
            })
            .collect()
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir(path)
    }
}

impl<T: Filesystem + ?Sized> Filesystem for &T {
    fn is_dir(&self, path: &Path) -> io::Result<bool> {
        (**self).is_dir(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirChild>> {
        (**self).read_dir(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        (**self).remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        (**self).remove_dir(path)
    }
}

impl<T: Filesystem + ?Sized> Filesystem for Arc<T> {
    fn is_dir(&self, path: &Path) -> io::Result<bool> {
        (**self).is_dir(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirChild>> {
        (**self).read_dir(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        (**self).remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        (**self).remove_dir(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_dir_reports_kinds() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("file.txt"), "x").unwrap();

        let mut children = StdFilesystem.read_dir(temp.path()).unwrap();
        children.sort_by(|a, b| a.path.cmp(&b.path));

        assert_eq!(children.len(), 2);
        assert!(!children[0].is_dir);
        assert!(children[1].is_dir);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_to_directory_is_not_a_directory() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("target");
        let link = temp.path().join("link");
        fs::create_dir(&target).unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert!(!StdFilesystem.is_dir(&link).unwrap());
        assert!(StdFilesystem.is_dir(&target).unwrap());
    }
}
