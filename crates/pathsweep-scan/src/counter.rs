//! Recursive file counting.

use std::path::Path;
use std::time::Duration;

use jwalk::{Parallelism, WalkDir};
use tracing::warn;

use pathsweep_core::{ResolveError, ResolveWarning};

/// Files counted under a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryCount {
    /// Non-directory entries found in the subtree.
    pub files: u64,
    /// Subtrees that could not be read; they contributed nothing.
    pub warnings: Vec<ResolveWarning>,
}

/// Counts the deletable files below a directory.
///
/// Called once per selected directory, so a failure on one path never
/// blocks counting the others.
pub trait FileCounter: Send + Sync {
    fn count_files(&self, dir: &Path) -> Result<DirectoryCount, ResolveError>;
}

/// Counter backed by a jwalk traversal.
#[derive(Debug, Clone, Default)]
pub struct JwalkCounter {
    threads: usize,
}

impl JwalkCounter {
    /// Create a counter using the default rayon pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a counter with a dedicated pool (0 = auto-detect).
    pub fn with_threads(threads: usize) -> Self {
        Self { threads }
    }

    fn parallelism(&self) -> Parallelism {
        match self.threads {
            0 => Parallelism::RayonDefaultPool {
                busy_timeout: Duration::from_millis(100),
            },
            1 => Parallelism::Serial,
            n => Parallelism::RayonNewPool(n),
        }
    }
}

impl FileCounter for JwalkCounter {
    fn count_files(&self, dir: &Path) -> Result<DirectoryCount, ResolveError> {
        let metadata = std::fs::symlink_metadata(dir).map_err(|e| ResolveError::io(dir, e))?;
        if !metadata.is_dir() {
            return Err(ResolveError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }

        let walker = WalkDir::new(dir)
            .parallelism(self.parallelism())
            .skip_hidden(false)
            .follow_links(false)
            .min_depth(1);

        let mut count = DirectoryCount::default();

        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| dir.to_path_buf());
                    warn!(path = %path.display(), error = %err, "skipping unreadable subtree");
                    count.warnings.push(ResolveWarning::new(path, err.to_string()));
                    continue;
                }
            };

            // Symlinks report their own type here, so a link to a
            // directory is one unit and is never descended into.
            if !entry.file_type().is_dir() {
                count.files += 1;
            }
        }

        Ok(count)
    }
}
