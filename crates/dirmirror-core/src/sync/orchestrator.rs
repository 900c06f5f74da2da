//! Sync orchestration - coordinates one scan, diff and apply pass

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use super::SyncOptions;
use super::actions::SyncOperation;
use super::events::{EventSink, SyncEvent};
use super::executor::FileOperationExecutor;
use crate::comparison::plan;
use crate::config::Config;
use crate::error::{ApplyError, ConfigError, ReconcileError};
use crate::scanner::{PatternMatcher, Scanner};

/// Main sync engine
///
/// Holds no state between passes: every call to [`Reconciler::reconcile`]
/// scans both trees afresh.
pub struct Reconciler {
    scanner: Scanner,
    sink: Arc<dyn EventSink>,
    options: SyncOptions,
    cancel: Option<Arc<AtomicBool>>,
}

impl Reconciler {
    /// Create a reconciler reporting to `sink`, with no exclusions
    #[must_use]
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            scanner: Scanner::default(),
            sink,
            options: SyncOptions::default(),
            cancel: None,
        }
    }

    /// Create a reconciler from a loaded configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pattern`] if an exclude or include pattern is invalid.
    pub fn from_config(config: &Config, sink: Arc<dyn EventSink>) -> Result<Self, ConfigError> {
        let filter = PatternMatcher::with_patterns(&config.exclude, &config.include)?;

        Ok(Self::new(sink)
            .with_filter(filter)
            .with_options(SyncOptions::from(config)))
    }

    /// Exclude matching paths from both trees
    #[must_use]
    pub fn with_filter(mut self, filter: PatternMatcher) -> Self {
        self.scanner = Scanner::new(filter);
        self
    }

    /// Set apply options
    #[must_use]
    pub const fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    /// Stop between operations once `flag` becomes true
    #[must_use]
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Run one pass making `replica_root` mirror `source_root`
    ///
    /// Both trees are scanned before anything is written. Failed operations
    /// are reported and skipped; the remaining ones are still attempted.
    ///
    /// # Errors
    ///
    /// - [`ReconcileError::Scan`] if either tree could not be scanned; nothing
    ///   was applied.
    /// - [`ReconcileError::Apply`] if at least one operation failed.
    /// - [`ReconcileError::Interrupted`] if cancellation was requested.
    pub fn reconcile(
        &self,
        source_root: &Path,
        replica_root: &Path,
    ) -> Result<Vec<SyncOperation>, ReconcileError> {
        let snapshots = self.scanner.scan(source_root).and_then(|source| {
            let replica = self.scanner.scan(replica_root)?;
            Ok((source, replica))
        });
        let (source, replica) = match snapshots {
            Ok(snapshots) => snapshots,
            Err(e) => {
                self.sink.emit(&SyncEvent::scan_failed(&e));
                return Err(e.into());
            }
        };

        let operations = plan(&source, &replica);
        debug!(
            source_files = source.len(),
            replica_files = replica.len(),
            operations = operations.len(),
            "planned pass"
        );

        let executor = FileOperationExecutor::new(source_root, replica_root, self.options);
        let mut applied = Vec::with_capacity(operations.len());
        let mut first_failure: Option<ApplyError> = None;
        let mut failed = 0;

        for operation in operations {
            if self.is_cancelled() {
                warn!(applied = applied.len(), "pass interrupted");
                return Err(ReconcileError::Interrupted { applied });
            }

            match executor.execute(&operation) {
                Ok(()) => {
                    self.sink
                        .emit(&SyncEvent::applied(&operation, self.options.dry_run));
                    applied.push(operation);
                }
                Err(e) => {
                    self.sink.emit(&SyncEvent::apply_failed(&e));
                    failed += 1;
                    first_failure.get_or_insert(e);
                }
            }
        }

        match first_failure {
            Some(first) => Err(ReconcileError::Apply {
                first,
                failed,
                applied,
            }),
            None => {
                if !applied.is_empty() {
                    info!(operations = applied.len(), "pass complete");
                }
                Ok(applied)
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }
}
