//! Shared run logger for scheduled maintenance runs.
//!
//! # Design
//! - One instance is shared by every task in a run; file writes are
//!   serialized by a mutex so lines never interleave.
//! - Two sinks: console-only (no filesystem access at all) or daily files
//!   under the configured log directory.
//! - Enabled levels are loaded once at startup from `logging.json` in the
//!   config directory; unknown levels fail open so new levels are never
//!   silently dropped.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;

use crate::error::{TelemetryError, TelemetryResult};

/// Log levels understood by the run logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// Verbose diagnostics, disabled by default.
    Debug,
    /// Phase boundaries and progress.
    Info,
    /// Skips and degraded-but-continuing conditions.
    Warn,
    /// Per-item failures.
    Error,
    /// Completed backup or delete operations.
    Success,
    /// End-of-run totals and summary counters.
    Count,
    /// Unrecoverable states; the caller decides whether to abort.
    Fatal,
}

impl Level {
    /// Canonical upper-case name used in log lines and `logging.json`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Success => "SUCCESS",
            Self::Count => "COUNT",
            Self::Fatal => "FATAL",
        }
    }
}

/// Controls where log lines go.
///
/// Scheduled runs usually want file logs so they can be inspected after the
/// fact; quick manual runs prefer console-only output.
#[derive(Debug, Clone)]
pub struct LogSettings {
    /// When `true`, lines go to stdout and no log files are created.
    pub no_logs: bool,
    /// Directory receiving the daily log files (file mode only).
    pub log_dir: PathBuf,
}

/// Thread-safe logger shared across walkers and the processor.
#[derive(Debug)]
pub struct Logger {
    settings: LogSettings,
    levels: HashMap<String, bool>,
    sink: Mutex<()>,
}

const LEVELS_FILE: &str = "logging.json";

impl Logger {
    /// Build a logger, loading level overrides from
    /// `<config_dir>/logging.json` when present.
    ///
    /// In file mode the log directory is created eagerly so permission
    /// problems surface at startup instead of silently losing a run's logs.
    ///
    /// # Errors
    ///
    /// Returns an error if the level configuration cannot be read or parsed,
    /// or if file logging is requested and the log directory is empty or
    /// cannot be created.
    pub fn new(config_dir: &Path, settings: LogSettings) -> TelemetryResult<Self> {
        let levels = load_levels(config_dir)?;

        if !settings.no_logs {
            if settings.log_dir.as_os_str().is_empty() {
                return Err(TelemetryError::EmptyLogDir);
            }
            std::fs::create_dir_all(&settings.log_dir).map_err(|source| {
                TelemetryError::CreateLogDir {
                    path: settings.log_dir.clone(),
                    source,
                }
            })?;
        }

        Ok(Self {
            settings,
            levels,
            sink: Mutex::new(()),
        })
    }

    /// Whether the given level is currently enabled.
    ///
    /// A level explicitly set to `false` in `logging.json` is disabled;
    /// everything else, including levels absent from the file, is enabled.
    #[must_use]
    pub fn enabled(&self, level: Level) -> bool {
        self.levels
            .get(level.as_str())
            .copied()
            .unwrap_or(true)
    }

    /// Write one log line.
    ///
    /// Output format: `[MM/DD/YY HH:MM:SS] [LEVEL] -> message`. In file mode
    /// every line lands in `maintenance_YYYY-MM-DD.log`; COUNT lines are
    /// duplicated into `count_YYYY-MM-DD.log` and ERROR lines into
    /// `errors_YYYY-MM-DD.log` so totals and failures are easy to scan.
    pub fn log(&self, level: Level, msg: &str) {
        if !self.enabled(level) {
            return;
        }

        let now = Local::now();
        let line = format!(
            "[{}] [{}] -> {}\n",
            now.format("%m/%d/%y %H:%M:%S"),
            level.as_str(),
            msg
        );

        if self.settings.no_logs {
            print!("{line}");
            return;
        }

        let date = now.format("%Y-%m-%d");
        let main_file = self.settings.log_dir.join(format!("maintenance_{date}.log"));

        let guard = self.sink.lock();
        // A poisoned mutex only means another thread panicked mid-write;
        // keep logging rather than going dark.
        let _guard = guard.unwrap_or_else(std::sync::PoisonError::into_inner);

        if let Err(err) = append_line(&main_file, &line) {
            // Stderr is the fallback visibility when file logging fails.
            eprintln!("error writing to log file: {err}");
            return;
        }

        let side_file = match level {
            Level::Count => Some(self.settings.log_dir.join(format!("count_{date}.log"))),
            Level::Error => Some(self.settings.log_dir.join(format!("errors_{date}.log"))),
            _ => None,
        };
        if let Some(path) = side_file
            && let Err(err) = append_line(&path, &line)
        {
            eprintln!("error writing to {} log file: {err}", level.as_str());
        }
    }

    /// Log at DEBUG.
    pub fn debug(&self, msg: &str) {
        self.log(Level::Debug, msg);
    }

    /// Log at INFO.
    pub fn info(&self, msg: &str) {
        self.log(Level::Info, msg);
    }

    /// Log at WARN.
    pub fn warn(&self, msg: &str) {
        self.log(Level::Warn, msg);
    }

    /// Log at ERROR.
    pub fn error(&self, msg: &str) {
        self.log(Level::Error, msg);
    }

    /// Log at SUCCESS.
    pub fn success(&self, msg: &str) {
        self.log(Level::Success, msg);
    }

    /// Log at COUNT.
    pub fn count(&self, msg: &str) {
        self.log(Level::Count, msg);
    }

    /// Log at FATAL.
    ///
    /// The logger itself never terminates the process; callers abort by
    /// returning an error after emitting the line.
    pub fn fatal(&self, msg: &str) {
        self.log(Level::Fatal, msg);
    }
}

/// Load enabled levels from `logging.json`, falling back to defaults when
/// the file is absent: DEBUG disabled, everything else enabled.
fn load_levels(config_dir: &Path) -> TelemetryResult<HashMap<String, bool>> {
    let path = config_dir.join(LEVELS_FILE);

    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(default_levels());
        }
        Err(source) => return Err(TelemetryError::LevelsRead { path, source }),
    };

    serde_json::from_str(&raw).map_err(|source| TelemetryError::LevelsParse { path, source })
}

fn default_levels() -> HashMap<String, bool> {
    let mut levels = HashMap::new();
    levels.insert("DEBUG".to_string(), false);
    levels.insert("INFO".to_string(), true);
    levels.insert("WARN".to_string(), true);
    levels.insert("ERROR".to_string(), true);
    levels.insert("SUCCESS".to_string(), true);
    levels.insert("COUNT".to_string(), true);
    levels.insert("FATAL".to_string(), true);
    levels
}

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())
}
