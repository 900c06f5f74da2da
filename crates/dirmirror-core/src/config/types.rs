//! Configuration types and structures

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default seconds between two passes
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 60;

/// Default log file, relative to the working directory
pub const DEFAULT_LOG_PATH: &str = "sync.log";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Seconds between the start of one pass and the next
    pub sync_interval_secs: u64,

    /// File receiving a copy of every logged event
    pub log_path: PathBuf,

    /// Gitignore-style patterns hidden from both trees
    pub exclude: Vec<String>,

    /// Patterns re-included over `exclude`
    pub include: Vec<String>,

    /// Remove replica directories left empty by deletions
    pub prune_empty_dirs: bool,

    /// Report planned operations without applying them
    pub dry_run: bool,
}

impl Config {
    /// Interval as a [`Duration`]
    #[must_use]
    pub const fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sync_interval_secs: DEFAULT_SYNC_INTERVAL_SECS,
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            exclude: Vec::new(),
            include: Vec::new(),
            prune_empty_dirs: false,
            dry_run: false,
        }
    }
}

/// Values given on the command line, applied over the file configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// `--sync-interval`
    pub sync_interval_secs: Option<u64>,
    /// `--log-path`
    pub log_path: Option<PathBuf>,
    /// `--exclude`, appended to the file's patterns
    pub exclude: Vec<String>,
    /// `--prune-empty-dirs`
    pub prune_empty_dirs: bool,
    /// `--dry-run`
    pub dry_run: bool,
}

impl ConfigOverrides {
    /// Apply these overrides onto `config`
    ///
    /// Flags can only switch boolean options on; a flag left unset keeps the
    /// file's value.
    pub fn apply(self, config: &mut Config) {
        if let Some(secs) = self.sync_interval_secs {
            config.sync_interval_secs = secs;
        }
        if let Some(path) = self.log_path {
            config.log_path = path;
        }
        config.exclude.extend(self.exclude);
        config.prune_empty_dirs |= self.prune_empty_dirs;
        config.dry_run |= self.dry_run;
    }
}
