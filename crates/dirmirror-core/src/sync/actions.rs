//! Sync operations derived from a snapshot diff

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scanner::RelativePath;

/// Filesystem operation to perform on the replica
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "path", rename_all = "lowercase")]
pub enum SyncOperation {
    /// Copy a file missing from the replica, creating parent directories
    Create(RelativePath),
    /// Overwrite a replica file whose content differs
    Update(RelativePath),
    /// Remove a replica file absent from the source
    Delete(RelativePath),
}

impl SyncOperation {
    /// Path the operation applies to
    #[must_use]
    pub const fn relative_path(&self) -> &RelativePath {
        match self {
            Self::Create(path) | Self::Update(path) | Self::Delete(path) => path,
        }
    }

    /// Kind tag without the path
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        match self {
            Self::Create(_) => OperationKind::Create,
            Self::Update(_) => OperationKind::Update,
            Self::Delete(_) => OperationKind::Delete,
        }
    }
}

impl fmt::Display for SyncOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind(), self.relative_path())
    }
}

/// Kind of [`SyncOperation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// See [`SyncOperation::Create`]
    Create,
    /// See [`SyncOperation::Update`]
    Update,
    /// See [`SyncOperation::Delete`]
    Delete,
}

impl OperationKind {
    /// Past-tense verb used in log lines
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Create => "copied",
            Self::Update => "updated",
            Self::Delete => "deleted",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
        })
    }
}
