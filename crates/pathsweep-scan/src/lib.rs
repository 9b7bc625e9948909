//! Selection resolver for pathsweep.
//!
//! Turns a [`Selection`] of files and directories into a
//! [`ResolvedSelection`]: every path is tagged as file, directory or
//! inaccessible, and the number of deletable units is counted.
//!
//! - **Files** count as one unit each (symlinks and other non-directory
//!   nodes included).
//! - **Directories** count the files they contain, recursively, using jwalk.
//!   Directories themselves are not units, and symlinks are never followed.
//! - **Unreadable subtrees** contribute nothing and are reported as warnings.
//!
//! Resolution never modifies the filesystem.
//!
//! # Example
//!
//! ```rust,no_run
//! use pathsweep_scan::{Selection, SelectionResolver};
//!
//! let selection = Selection::new(["/tmp/build", "/tmp/notes.txt"]);
//! let resolved = SelectionResolver::new().resolve(&selection).unwrap();
//!
//! println!("{} files across {} paths", resolved.total, resolved.len());
//! ```

mod counter;
mod resolver;

pub use counter::{DirectoryCount, FileCounter, JwalkCounter};
pub use resolver::SelectionResolver;

// Re-export core types for convenience
pub use pathsweep_core::{
    BatchError, DeleteError, EntryKind, ResolveError, ResolveWarning, ResolvedSelection,
    Selection, SelectionEntry,
};
