//! Atomic file operations executor
//!
//! Copies go to a hidden temporary sibling of the target, are flushed, and
//! are then renamed over it. The replica therefore only ever contains the
//! old file or the complete new one, even if the process stops mid-copy.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};
use walkdir::WalkDir;

use super::SyncOptions;
use super::actions::SyncOperation;
use crate::error::ApplyError;
use crate::scanner::RelativePath;

/// Applies [`SyncOperation`]s from a source root onto a replica root
pub struct FileOperationExecutor<'a> {
    source_root: &'a Path,
    replica_root: &'a Path,
    options: SyncOptions,
}

impl<'a> FileOperationExecutor<'a> {
    /// Create an executor for one pass
    #[must_use]
    pub const fn new(source_root: &'a Path, replica_root: &'a Path, options: SyncOptions) -> Self {
        Self {
            source_root,
            replica_root,
            options,
        }
    }

    /// Execute a single operation
    ///
    /// # Errors
    ///
    /// Returns an [`ApplyError`] describing the failed filesystem call.
    pub fn execute(&self, operation: &SyncOperation) -> Result<(), ApplyError> {
        if self.options.dry_run {
            debug!(%operation, "dry run, not applied");
            return Ok(());
        }

        match operation {
            SyncOperation::Create(path) | SyncOperation::Update(path) => self.copy_file(path),
            SyncOperation::Delete(path) => self.delete_file(path),
        }
    }

    /// Copy a source file over its replica path, atomically
    fn copy_file(&self, relative: &RelativePath) -> Result<(), ApplyError> {
        let source = relative.to_native(self.source_root);
        let dest = relative.to_native(self.replica_root);

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|source| ApplyError::CreateDir {
                relative_path: relative.clone(),
                dir: parent.to_path_buf(),
                source,
            })?;
        }

        // A directory may occupy the path when the source replaced it with a file
        if dest.is_dir() {
            self.clear_directory(relative, &dest)?;
        }

        let temp = temp_path(&dest);
        let result = write_copy(&source, &temp).and_then(|()| fs::rename(&temp, &dest));
        if let Err(source) = result {
            let _ = fs::remove_file(&temp);
            return Err(ApplyError::Copy {
                relative_path: relative.clone(),
                source,
            });
        }

        Ok(())
    }

    /// Remove a directory standing where a file must go, if it holds no files
    fn clear_directory(&self, relative: &RelativePath, dir: &Path) -> Result<(), ApplyError> {
        let holds_files = WalkDir::new(dir)
            .into_iter()
            .any(|entry| !matches!(entry, Ok(e) if e.file_type().is_dir()));

        if holds_files {
            return Err(ApplyError::Blocked {
                relative_path: relative.clone(),
                path: dir.to_path_buf(),
            });
        }

        debug!(path = %dir.display(), "removing empty directory in place of file");
        fs::remove_dir_all(dir).map_err(|source| ApplyError::Delete {
            relative_path: relative.clone(),
            source,
        })
    }

    /// Remove a replica file
    fn delete_file(&self, relative: &RelativePath) -> Result<(), ApplyError> {
        let path = relative.to_native(self.replica_root);

        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %relative, "already gone");
            }
            Err(source) => {
                return Err(ApplyError::Delete {
                    relative_path: relative.clone(),
                    source,
                });
            }
        }

        if self.options.prune_empty_dirs {
            self.prune_empty_parents(&path);
        }

        Ok(())
    }

    /// Remove directories emptied by a delete, stopping at the replica root
    fn prune_empty_parents(&self, path: &Path) {
        let mut current = path.parent();

        while let Some(dir) = current {
            if dir == self.replica_root || !dir.starts_with(self.replica_root) {
                break;
            }

            let is_empty = fs::read_dir(dir).is_ok_and(|mut entries| entries.next().is_none());
            if !is_empty {
                break;
            }

            if let Err(e) = fs::remove_dir(dir) {
                warn!(path = %dir.display(), error = %e, "failed to prune empty directory");
                break;
            }
            debug!(path = %dir.display(), "pruned empty directory");
            current = dir.parent();
        }
    }
}

/// Hidden sibling of `dest` used as the copy target before the rename
///
/// The name has a fixed length so a target at `NAME_MAX` still gets a valid
/// temp name.
fn temp_path(dest: &Path) -> PathBuf {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    dest.with_file_name(format!(".dirmirror-{}-{seq}.tmp", std::process::id()))
}

/// Stream `source` into `temp`, then carry over permissions and mtime
fn write_copy(source: &Path, temp: &Path) -> io::Result<()> {
    let mut reader = File::open(source)?;
    let metadata = reader.metadata()?;

    let mut writer = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp)?;
    io::copy(&mut reader, &mut writer)?;

    writer.set_permissions(metadata.permissions())?;
    writer.set_modified(metadata.modified()?)?;
    writer.sync_all()?;

    Ok(())
}
