//! # dirmirror-core
//!
//! Core library for one-way directory mirroring.
//!
//! This library scans a source and a replica directory tree, compares them by
//! SHA-256 content fingerprint, and applies the create, update and delete
//! operations that make the replica an exact copy of the source.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Error types for scanning, applying and configuration
pub mod error;

/// Recursive directory scanning into content snapshots
pub mod scanner;

/// Content fingerprinting and snapshot diffing
pub mod comparison;

/// Configuration file parsing, discovery and validation
pub mod config;

/// One-way synchronization engine
pub mod sync;

pub use comparison::{Fingerprint, plan};
pub use config::Config;
pub use error::{ApplyError, ConfigError, ReconcileError, ScanError};
pub use scanner::{PatternMatcher, RelativePath, Scanner, TreeSnapshot};
pub use sync::{
    EventSink, MemorySink, Reconciler, SyncEvent, SyncOperation, SyncOptions, SyncReporter,
    SyncResult, TracingSink,
};
