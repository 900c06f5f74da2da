use clap::Parser;
use dirmirror_core::config::ConfigOverrides;
use std::path::PathBuf;

/// One-way directory mirror
///
/// Keep REPLICA_PATH an exact copy of SOURCE_PATH: files are compared by
/// SHA-256 content and copied, updated or deleted on every pass until the
/// process is interrupted.
#[derive(Parser, Debug)]
#[command(name = "dirmirror")]
#[command(about, long_about, version)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Directory to mirror from
    #[arg(value_name = "SOURCE_PATH")]
    pub source: PathBuf,

    /// Directory kept identical to the source (created if missing)
    #[arg(value_name = "REPLICA_PATH")]
    pub replica: PathBuf,

    /// Seconds between synchronization passes [default: 60]
    #[arg(
        long,
        value_name = "SECONDS",
        env = "DIRMIRROR_SYNC_INTERVAL",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub sync_interval: Option<u64>,

    /// File receiving a copy of every log line [default: sync.log]
    #[arg(long, value_name = "PATH", env = "DIRMIRROR_LOG_PATH")]
    pub log_path: Option<PathBuf>,

    /// Gitignore-style pattern excluded from both trees (repeatable)
    #[arg(long, value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Remove replica directories left empty by deletions
    #[arg(long)]
    pub prune_empty_dirs: bool,

    /// Report what would change without touching the replica
    #[arg(long)]
    pub dry_run: bool,

    /// Use specific config file
    #[arg(long, value_name = "PATH", conflicts_with = "no_config")]
    pub config: Option<PathBuf>,

    /// Ignore all config files
    #[arg(long, conflicts_with = "config")]
    pub no_config: bool,

    /// Run a single pass and exit
    #[arg(long)]
    pub once: bool,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Flags that take precedence over the config file
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            sync_interval_secs: self.sync_interval,
            log_path: self.log_path.clone(),
            exclude: self.exclude.clone(),
            prune_empty_dirs: self.prune_empty_dirs,
            dry_run: self.dry_run,
        }
    }
}
