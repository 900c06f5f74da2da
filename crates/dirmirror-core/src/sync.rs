//! One-way synchronization engine
//!
//! A pass scans source and replica, diffs the two snapshots, and applies the
//! resulting operations one at a time, reporting each through an
//! [`EventSink`]. The engine has no loop and no notion of an interval; the
//! caller decides when to run the next pass.

mod actions;
mod events;
mod executor;
mod orchestrator;
mod reporting;

pub use actions::{OperationKind, SyncOperation};
pub use events::{ErrorKind, EventSink, MemorySink, SyncEvent, TracingSink};
pub use executor::FileOperationExecutor;
pub use orchestrator::Reconciler;
pub use reporting::SyncReporter;

use crate::config::Config;
use crate::error::ReconcileError;

/// How operations are applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Plan and report without touching the replica
    pub dry_run: bool,
    /// Remove replica directories left empty by deletions
    pub prune_empty_dirs: bool,
}

impl From<&Config> for SyncOptions {
    fn from(config: &Config) -> Self {
        Self {
            dry_run: config.dry_run,
            prune_empty_dirs: config.prune_empty_dirs,
        }
    }
}

/// Synchronization result with statistics
#[derive(Debug, Clone, Default)]
pub struct SyncResult {
    /// Files created
    pub created: usize,
    /// Files updated
    pub updated: usize,
    /// Files deleted
    pub deleted: usize,
    /// Errors encountered
    pub errors: Vec<String>,
    /// Pass stopped early on request
    pub interrupted: bool,
}

impl SyncResult {
    /// Summarize the outcome of [`Reconciler::reconcile`]
    #[must_use]
    pub fn from_outcome(outcome: &Result<Vec<SyncOperation>, ReconcileError>) -> Self {
        let applied = match outcome {
            Ok(applied) => applied.as_slice(),
            Err(e) => e.applied(),
        };

        let mut result = Self::default();
        for operation in applied {
            match operation.kind() {
                OperationKind::Create => result.created += 1,
                OperationKind::Update => result.updated += 1,
                OperationKind::Delete => result.deleted += 1,
            }
        }

        match outcome {
            Ok(_) => {}
            Err(ReconcileError::Scan(e)) => result.errors.push(e.to_string()),
            Err(ReconcileError::Apply { first, failed, .. }) => {
                result.errors.push(first.to_string());
                if *failed > 1 {
                    result
                        .errors
                        .push(format!("{} more operation(s) failed", failed - 1));
                }
            }
            Err(ReconcileError::Interrupted { .. }) => result.interrupted = true,
        }

        result
    }

    /// Total operations performed
    #[must_use]
    pub const fn total_operations(&self) -> usize {
        self.created + self.updated + self.deleted
    }

    /// Whether sync was successful (no errors)
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.errors.is_empty() && !self.interrupted
    }
}
