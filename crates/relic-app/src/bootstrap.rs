//! Application boot sequence: configuration, logging, the safety gate, the
//! engine run, and log housekeeping.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use relic_config::ConfigError;
use relic_engine::{MaintenanceEngine, RunOptions, plan_roots, prune_old_logs, verify_backup_root};
use relic_notify::{Notifier, PopupNotifier};
use relic_telemetry::{DEFAULT_LOG_LEVEL, LogSettings, Logger};
use tracing::info;

use crate::cli::Cli;
use crate::error::{AppError, AppResult};

/// Entry point for the binary: parse flags, install the console subscriber,
/// and run the application.
///
/// # Errors
///
/// Returns an error if logging, configuration, the backup gate, or the run
/// itself fails; the process exits non-zero in every one of those cases.
pub async fn run_app() -> AppResult<()> {
    let cli = <Cli as clap::Parser>::parse();
    relic_telemetry::init_console(DEFAULT_LOG_LEVEL)
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;
    run_with(cli, &PopupNotifier).await
}

/// Boot sequence with injected flags and notifier, for tests and embedding.
/// Assumes the tracing subscriber is already installed (or intentionally
/// absent).
///
/// # Errors
///
/// See [`run_app`].
pub async fn run_with(cli: Cli, notifier: &dyn Notifier) -> AppResult<()> {
    // Scheduled tasks often start with a surprising working directory, so
    // config/ and logs/ default to the executable's own directory.
    let root = app_root();
    let config_dir = cli
        .config_dir
        .clone()
        .unwrap_or_else(|| root.join("config"));
    let log_dir = cli.log_dir.clone().unwrap_or_else(|| root.join("logs"));

    if cli.init_config {
        let path = relic_config::write_sample_config(&config_dir)
            .map_err(|err| AppError::config("config.init", err))?;
        info!(path = %path.display(), "sample configuration written; fill it in and run again");
        return Ok(());
    }

    let logger = Arc::new(
        Logger::new(
            &config_dir,
            LogSettings {
                no_logs: cli.no_logs,
                log_dir: log_dir.clone(),
            },
        )
        .map_err(|err| AppError::telemetry("logger.new", err))?,
    );

    let config = match relic_config::load_config(&config_dir, &logger) {
        Ok(config) => config,
        Err(err) => {
            if matches!(err, ConfigError::Read { .. }) {
                logger.fatal(&format!(
                    "No configuration found in {}; run with --init-config to create a sample",
                    config_dir.display()
                ));
            }
            return Err(AppError::config("config.load", err));
        }
    };

    for entry in &config.roots {
        let backup = if entry.backup_enabled { "yes" } else { "no" };
        logger.info(&format!(
            "Path: {} (backup: {backup})",
            entry.path.display()
        ));
    }

    let roots = plan_roots(
        config
            .roots
            .iter()
            .map(|entry| (entry.path.clone(), entry.backup_enabled)),
    );

    let any_backup_enabled = roots.iter().any(|root| root.backup_enabled);
    if any_backup_enabled {
        logger.info(&format!(
            "Backup location: {}",
            config.backup_root.display()
        ));

        // Abort before any walker starts: no deletion may precede a
        // verified backup destination.
        if let Err(err) = verify_backup_root(&config.backup_root) {
            let message = format!(
                "Backup path is not accessible: {}\n\nPlease check path and permissions.",
                config.backup_root.display()
            );
            notifier.notify("Backup Location Error", &message);
            logger.fatal(&format!(
                "Backup path is not accessible: {}",
                config.backup_root.display()
            ));
            return Err(AppError::engine("backup.gate", err));
        }
    } else {
        logger.warn("All paths have backup disabled - running in delete-only mode");
    }

    let options = RunOptions {
        retention_days: cli.days,
        backup_root: config.backup_root,
        walker_count: cli.walkers,
        queue_capacity: cli.queue_size,
        max_files: cli.max_files,
        max_runtime: cli.max_runtime,
        cooldown: cli.cooldown,
        retries: cli.retries,
    };
    let engine = MaintenanceEngine::new(options, Arc::clone(&logger));
    let report = engine
        .run(roots)
        .await
        .map_err(|err| AppError::engine("maintenance.run", err))?;
    info!(
        processed = report.processed,
        deleted = report.deleted,
        stopped_early = report.stopped_early,
        "maintenance run complete"
    );

    // Housekeeping only applies when file logging produced anything to keep.
    if !cli.no_logs {
        prune_old_logs(&log_dir, cli.log_retention)
            .map_err(|err| AppError::engine("logs.prune", err))?;
    }

    Ok(())
}

/// Directory containing the running executable, with symlinks resolved,
/// falling back to the current working directory.
fn app_root() -> PathBuf {
    exe_dir()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn exe_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let exe = exe.canonicalize().unwrap_or(exe);
    exe.parent().map(Path::to_path_buf)
}
