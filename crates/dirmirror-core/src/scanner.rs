//! Recursive directory scanning into content snapshots
//!
//! A scan either captures every regular file under the root or fails as a
//! whole. Skipping an unreadable subdirectory would make its files look
//! deleted and trigger spurious deletions on the replica side.

mod filters;
mod snapshot;


use std::path::Path;

use tracing::{debug, trace};
use walkdir::WalkDir;

pub use filters::PatternMatcher;
pub use snapshot::{RelativePath, TreeSnapshot};

use crate::comparison::FileHasher;
use crate::error::ScanError;

/// Builds [`TreeSnapshot`]s of directory trees
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    filter: PatternMatcher,
}

impl Scanner {
    /// Create a scanner applying the given exclusion filter
    #[must_use]
    pub const fn new(filter: PatternMatcher) -> Self {
        Self { filter }
    }

    /// Fingerprint every regular file under `root`
    ///
    /// Symlinks are neither followed nor recorded, and directories only
    /// contribute through the files they contain.
    ///
    /// # Errors
    ///
    /// Returns a [`ScanError`] if the root is missing or not a directory, if
    /// any directory cannot be traversed, or if any file cannot be read.
    pub fn scan(&self, root: &Path) -> Result<TreeSnapshot, ScanError> {
        let metadata = match root.metadata() {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ScanError::RootMissing {
                    path: root.to_path_buf(),
                });
            }
            Err(source) => {
                return Err(ScanError::Read {
                    path: root.to_path_buf(),
                    source,
                });
            }
        };
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        let mut snapshot = TreeSnapshot::new();
        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| self.is_included(root, entry));

        for entry in walker {
            let entry = entry.map_err(|source| ScanError::Walk {
                path: source.path().unwrap_or(root).to_path_buf(),
                source,
            })?;

            let file_type = entry.file_type();
            if file_type.is_dir() {
                continue;
            }
            if !file_type.is_file() {
                trace!(path = %entry.path().display(), "skipping non-regular file");
                continue;
            }

            let relative = RelativePath::from_root(root, entry.path())?;
            let fingerprint = FileHasher::hash(entry.path())?;
            trace!(path = %relative, %fingerprint, "scanned file");
            snapshot.insert(relative, fingerprint);
        }

        debug!(root = %root.display(), files = snapshot.len(), "scan complete");
        Ok(snapshot)
    }

    fn is_included(&self, root: &Path, entry: &walkdir::DirEntry) -> bool {
        if entry.depth() == 0 || self.filter.is_empty() {
            return true;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        self.filter
            .should_include(relative, entry.file_type().is_dir())
    }
}
