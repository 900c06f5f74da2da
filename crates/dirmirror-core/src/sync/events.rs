//! Per-operation events and the sinks that receive them
//!
//! The engine never writes logs itself. It hands every event to the
//! [`EventSink`] it was built with, so callers decide where events go and
//! tests can capture them without any process-wide logger.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use super::actions::{OperationKind, SyncOperation};
use crate::error::{ApplyError, ScanError};
use crate::scanner::RelativePath;

/// Category of a reported failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// A tree could not be scanned; the pass was aborted
    ScanError,
    /// A single operation failed; the pass continued
    ApplyError,
}

/// Something the engine did or failed to do
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SyncEvent {
    /// An operation was applied to the replica
    Applied {
        /// Operation kind
        kind: OperationKind,
        /// File the operation touched
        relative_path: RelativePath,
        /// When it completed
        timestamp: DateTime<Utc>,
        /// Planned only, nothing was written
        dry_run: bool,
    },
    /// A scan or an operation failed
    Error {
        /// Failure category
        kind: ErrorKind,
        /// Human-readable description
        detail: String,
        /// File involved, when the failure concerns one file
        relative_path: Option<RelativePath>,
        /// When it was observed
        timestamp: DateTime<Utc>,
    },
}

impl SyncEvent {
    /// Event for a successfully applied operation
    #[must_use]
    pub fn applied(operation: &SyncOperation, dry_run: bool) -> Self {
        Self::Applied {
            kind: operation.kind(),
            relative_path: operation.relative_path().clone(),
            timestamp: Utc::now(),
            dry_run,
        }
    }

    /// Event for an aborted scan
    #[must_use]
    pub fn scan_failed(err: &ScanError) -> Self {
        Self::Error {
            kind: ErrorKind::ScanError,
            detail: err.to_string(),
            relative_path: None,
            timestamp: Utc::now(),
        }
    }

    /// Event for a failed operation
    #[must_use]
    pub fn apply_failed(err: &ApplyError) -> Self {
        Self::Error {
            kind: ErrorKind::ApplyError,
            detail: err.to_string(),
            relative_path: Some(err.relative_path().clone()),
            timestamp: Utc::now(),
        }
    }

    /// Whether this event reports a failure
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Destination for [`SyncEvent`]s
pub trait EventSink: Send + Sync {
    /// Receive one event, as soon as it happens
    fn emit(&self, event: &SyncEvent);
}

/// Forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &SyncEvent) {
        match event {
            SyncEvent::Applied {
                kind,
                relative_path,
                dry_run: false,
                ..
            } => {
                info!(target: "dirmirror::events", op = %kind, path = %relative_path, "File {}: {relative_path}", kind.verb());
            }
            SyncEvent::Applied {
                kind,
                relative_path,
                dry_run: true,
                ..
            } => {
                info!(target: "dirmirror::events", op = %kind, path = %relative_path, "[DRY RUN] Would be {}: {relative_path}", kind.verb());
            }
            SyncEvent::Error {
                kind,
                detail,
                relative_path: Some(path),
                ..
            } => {
                error!(target: "dirmirror::events", kind = ?kind, path = %path, "{detail}");
            }
            SyncEvent::Error {
                kind,
                detail,
                relative_path: None,
                ..
            } => {
                error!(target: "dirmirror::events", kind = ?kind, "{detail}");
            }
        }
    }
}

/// Collects events in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<SyncEvent>>,
}

impl MemorySink {
    /// Create an empty sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every event received so far
    #[must_use]
    pub fn events(&self) -> Vec<SyncEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain the received events
    pub fn take(&self) -> Vec<SyncEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: &SyncEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
