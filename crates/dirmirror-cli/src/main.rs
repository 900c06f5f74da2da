mod cli;
mod logging;
mod scheduler;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use dirmirror_core::config::{
    ConfigManager, prepare_replica_root, validate_log_path, validate_roots,
};
use dirmirror_core::{ReconcileError, Reconciler, SyncReporter, SyncResult, TracingSink};
use scheduler::IntervalScheduler;
use tracing::{debug, info, warn};

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = ConfigManager::load(cli.config.as_deref(), cli.no_config, cli.overrides())
        .context("Failed to load configuration")?;

    // Checked before the log file is opened so a rejected path is never created
    validate_roots(&cli.source, &cli.replica).context("Invalid source or replica path")?;
    validate_log_path(&config.log_path, &cli.source, &cli.replica).context("Invalid log path")?;

    logging::init(&config.log_path, cli.verbose).context("Failed to set up logging")?;
    debug!(?config, "effective configuration");

    prepare_replica_root(&cli.replica).context("Failed to prepare replica directory")?;

    // Ctrl+C / SIGTERM stops the running pass between operations and wakes the scheduler
    let cancel = Arc::new(AtomicBool::new(false));
    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    let handler_flag = Arc::clone(&cancel);
    ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::SeqCst);
        let _ = shutdown_tx.send(());
    })
    .context("Failed to set Ctrl+C handler")?;

    let reconciler = Reconciler::from_config(&config, Arc::new(TracingSink))
        .context("Failed to build sync engine")?
        .with_cancellation(cancel);

    info!(
        source = %cli.source.display(),
        replica = %cli.replica.display(),
        interval_secs = config.sync_interval_secs,
        dry_run = config.dry_run,
        "Starting the sync process"
    );

    if cli.once {
        let result = run_pass(&reconciler, &cli.source, &cli.replica);
        let code = if result.errors.is_empty() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
        return Ok(code);
    }

    let passes = IntervalScheduler::new(config.sync_interval(), shutdown_rx).run(|| {
        run_pass(&reconciler, &cli.source, &cli.replica);
    });

    info!(passes, "Sync process interrupted by user");
    Ok(ExitCode::SUCCESS)
}

/// Run one reconciliation pass and log its outcome
fn run_pass(reconciler: &Reconciler, source: &Path, replica: &Path) -> SyncResult {
    let outcome = reconciler.reconcile(source, replica);
    let result = SyncResult::from_outcome(&outcome);

    match &outcome {
        Ok(_) => {}
        Err(ReconcileError::Scan(_)) => warn!("Pass aborted, retrying on next interval"),
        Err(ReconcileError::Apply { failed, .. }) => {
            warn!(failed, "Pass completed with errors");
        }
        Err(ReconcileError::Interrupted { .. }) => info!("Pass interrupted"),
    }

    if result.total_operations() > 0 || !result.is_success() {
        info!("Pass finished: {}", SyncReporter::one_line(&result));
    }
    debug!("{}", SyncReporter::generate_summary(&result));

    result
}
