//! Error taxonomy for the mirror engine
//!
//! - [`ScanError`] aborts a whole pass: no operation derived from an
//!   incomplete snapshot is ever applied.
//! - [`ApplyError`] covers a single operation; the pass keeps going.
//! - [`ReconcileError`] is what a pass returns when it did not fully succeed.

use std::io;
use std::path::PathBuf;

use crate::scanner::RelativePath;
use crate::sync::SyncOperation;

/// Result type alias for configuration loading
pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

/// Failure while building a snapshot of one tree
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The root directory does not exist
    #[error("root does not exist: {}", path.display())]
    RootMissing {
        /// Root that was requested
        path: PathBuf,
    },

    /// The root exists but is not a directory
    #[error("root is not a directory: {}", path.display())]
    NotADirectory {
        /// Root that was requested
        path: PathBuf,
    },

    /// Directory traversal failed (typically an unreadable subdirectory)
    #[error("failed to walk {}: {source}", path.display())]
    Walk {
        /// Entry that could not be visited
        path: PathBuf,
        /// Underlying traversal error
        #[source]
        source: walkdir::Error,
    },

    /// A file could not be read while fingerprinting it
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A path below the root is not valid UTF-8
    #[error("path is not valid UTF-8: {}", path.display())]
    NonUtf8Path {
        /// Offending path
        path: PathBuf,
    },
}

/// Failure of a single filesystem operation on the replica
#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    /// Intermediate directories could not be created
    #[error("failed to create directory {} for {relative_path}: {source}", dir.display())]
    CreateDir {
        /// File the directory was needed for
        relative_path: RelativePath,
        /// Directory that could not be created
        dir: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Copying the source file over the replica path failed
    #[error("failed to copy {relative_path}: {source}")]
    Copy {
        /// File being copied
        relative_path: RelativePath,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Removing the replica file failed
    #[error("failed to delete {relative_path}: {source}")]
    Delete {
        /// File being removed
        relative_path: RelativePath,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A directory holding files occupies the path of a file to create
    #[error("cannot create {relative_path}: directory {} is in the way and not empty", path.display())]
    Blocked {
        /// File that could not be created
        relative_path: RelativePath,
        /// Directory in the way
        path: PathBuf,
    },
}

impl ApplyError {
    /// Relative path of the operation that failed
    #[must_use]
    pub const fn relative_path(&self) -> &RelativePath {
        match self {
            Self::CreateDir { relative_path, .. }
            | Self::Copy { relative_path, .. }
            | Self::Delete { relative_path, .. }
            | Self::Blocked { relative_path, .. } => relative_path,
        }
    }
}

/// Outcome of a pass that did not complete cleanly
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// One of the two scans failed; nothing was applied
    #[error("scan failed, pass aborted: {0}")]
    Scan(#[from] ScanError),

    /// At least one operation failed; the others were still attempted
    #[error("{failed} operation(s) failed, first: {first}")]
    Apply {
        /// First failure encountered
        #[source]
        first: ApplyError,
        /// Total number of failed operations
        failed: usize,
        /// Operations that succeeded
        applied: Vec<SyncOperation>,
    },

    /// Cancellation was requested between two operations
    #[error("pass interrupted after {} operation(s)", applied.len())]
    Interrupted {
        /// Operations applied before the interruption
        applied: Vec<SyncOperation>,
    },
}

impl ReconcileError {
    /// Operations that were applied before the pass stopped or failed
    #[must_use]
    pub fn applied(&self) -> &[SyncOperation] {
        match self {
            Self::Scan(_) => &[],
            Self::Apply { applied, .. } | Self::Interrupted { applied } => applied,
        }
    }
}

/// Configuration loading and validation failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        /// Config file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Config file is not valid TOML for [`crate::Config`]
    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        /// Config file path
        path: PathBuf,
        /// Parser error
        #[source]
        source: toml::de::Error,
    },

    /// A value is out of range or inconsistent
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// An exclude or include pattern does not compile
    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        /// Pattern as written
        pattern: String,
        /// Compiler error
        #[source]
        source: ignore::Error,
    },

    /// Source root, replica root or log path is unusable
    #[error("invalid path {}: {reason}", path.display())]
    Root {
        /// Path as given
        path: PathBuf,
        /// What is wrong with it
        reason: String,
    },
}
