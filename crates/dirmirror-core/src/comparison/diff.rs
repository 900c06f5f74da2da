//! Snapshot diffing into an ordered operation plan
//!
//! The plan is built from explicit key-set operations over the two
//! snapshots. Deletes come first so that a replica file whose path becomes
//! a directory in the source (or that differs from a new source name only by
//! case on a case-insensitive filesystem) is out of the way before the
//! creates run. Creates and updates follow in relative-path order, which
//! also guarantees parent directories are created before their children.

use std::collections::BTreeSet;

use crate::scanner::{RelativePath, TreeSnapshot};
use crate::sync::SyncOperation;

/// Paths classified by how they differ between source and replica
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    /// In source only
    pub added: BTreeSet<RelativePath>,
    /// In both, with different fingerprints
    pub modified: BTreeSet<RelativePath>,
    /// In replica only
    pub removed: BTreeSet<RelativePath>,
    /// In both, with equal fingerprints
    pub unchanged: BTreeSet<RelativePath>,
}

impl SnapshotDiff {
    /// Classify every path present in either snapshot
    #[must_use]
    pub fn between(source: &TreeSnapshot, replica: &TreeSnapshot) -> Self {
        let source_keys: BTreeSet<&RelativePath> = source.paths().collect();
        let replica_keys: BTreeSet<&RelativePath> = replica.paths().collect();

        let added = source_keys
            .difference(&replica_keys)
            .map(|p| (*p).clone())
            .collect();
        let removed = replica_keys
            .difference(&source_keys)
            .map(|p| (*p).clone())
            .collect();

        let (modified, unchanged): (BTreeSet<_>, BTreeSet<_>) = source_keys
            .intersection(&replica_keys)
            .map(|p| (*p).clone())
            .partition(|p| source.get(p) != replica.get(p));

        Self {
            added,
            modified,
            removed,
            unchanged,
        }
    }

    /// Whether the trees already match
    #[must_use]
    pub fn is_identical(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }

    /// Number of operations needed to converge
    #[must_use]
    pub fn change_count(&self) -> usize {
        self.added.len() + self.modified.len() + self.removed.len()
    }

    /// Ordered operations: deletes, then creates and updates by path
    #[must_use]
    pub fn into_operations(self) -> Vec<SyncOperation> {
        let mut operations: Vec<SyncOperation> =
            self.removed.into_iter().map(SyncOperation::Delete).collect();

        let mut writes: Vec<SyncOperation> = self
            .added
            .into_iter()
            .map(SyncOperation::Create)
            .chain(self.modified.into_iter().map(SyncOperation::Update))
            .collect();
        writes.sort_by(|a, b| a.relative_path().cmp(b.relative_path()));

        operations.extend(writes);
        operations
    }
}

/// Compute the operations that make `replica` match `source`
#[must_use]
pub fn plan(source: &TreeSnapshot, replica: &TreeSnapshot) -> Vec<SyncOperation> {
    SnapshotDiff::between(source, replica).into_operations()
}
