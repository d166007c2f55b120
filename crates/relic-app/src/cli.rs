//! Command-line flags for scheduled and manual maintenance runs.
//!
//! Flags are explicit and conservatively defaulted because the binary is
//! usually launched unattended by the OS scheduler: resource controls
//! (walkers, queue size, caps, cooldown, retries) bound a run's impact, and
//! config/log directories default to the executable's own directory so the
//! scheduler's working directory cannot surprise anyone.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Scheduled cleanup of aged files with copy-before-delete backup.
#[derive(Debug, Parser)]
#[command(name = "relic", version, about)]
pub struct Cli {
    /// Number of days to retain files; only strictly older files are
    /// processed.
    #[arg(long, default_value_t = 7)]
    pub days: u32,

    /// Number of days to retain log files.
    #[arg(long = "log-retention", default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..))]
    pub log_retention: u32,

    /// Config directory (defaults to `config/` next to the binary).
    #[arg(long = "config-dir")]
    pub config_dir: Option<PathBuf>,

    /// Log directory (defaults to `logs/` next to the binary).
    #[arg(long = "log-dir")]
    pub log_dir: Option<PathBuf>,

    /// Disable file logging and send run output to stdout.
    #[arg(long = "no-logs")]
    pub no_logs: bool,

    /// Number of concurrent folder walkers.
    #[arg(long, default_value_t = 1, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub walkers: usize,

    /// Capacity of the job queue between walkers and the processor.
    #[arg(long = "queue-size", default_value_t = 300, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub queue_size: usize,

    /// Maximum number of jobs to handle in one run (0 = unlimited).
    #[arg(long = "max-files", default_value_t = 0)]
    pub max_files: u64,

    /// Maximum runtime, e.g. `30m`, `90s`, `2h` (0 = unlimited).
    #[arg(long = "max-runtime", default_value = "30m", value_parser = parse_duration)]
    pub max_runtime: Duration,

    /// Pause after each handled file, e.g. `500ms` (0 = none).
    #[arg(long, default_value = "0s", value_parser = parse_duration)]
    pub cooldown: Duration,

    /// Number of copy retries after the first failure.
    #[arg(long, default_value_t = 2)]
    pub retries: u32,

    /// Write a commented sample config.ini into the config directory and
    /// exit.
    #[arg(long = "init-config")]
    pub init_config: bool,
}

/// Parse a human-friendly duration: a number followed by `ms`, `s`, `m`, or
/// `h`. A bare `0` is accepted as "unlimited".
fn parse_duration(raw: &str) -> Result<Duration, String> {
    let raw = raw.trim();
    if raw == "0" {
        return Ok(Duration::ZERO);
    }

    let (digits, unit) = match raw.find(|c: char| !c.is_ascii_digit()) {
        Some(split) => raw.split_at(split),
        None => return Err(format!("missing unit in duration '{raw}' (use ms, s, m, h)")),
    };
    let value: u64 = digits
        .parse()
        .map_err(|_| format!("invalid duration '{raw}'"))?;

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => Ok(Duration::from_secs(value * 60)),
        "h" => Ok(Duration::from_secs(value * 3600)),
        other => Err(format!("unknown duration unit '{other}' (use ms, s, m, h)")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_parse_with_units() {
        assert_eq!(parse_duration("0").expect("parses"), Duration::ZERO);
        assert_eq!(
            parse_duration("250ms").expect("parses"),
            Duration::from_millis(250)
        );
        assert_eq!(parse_duration("90s").expect("parses"), Duration::from_secs(90));
        assert_eq!(
            parse_duration("30m").expect("parses"),
            Duration::from_secs(1800)
        );
        assert_eq!(
            parse_duration("2h").expect("parses"),
            Duration::from_secs(7200)
        );
    }

    #[test]
    fn bad_durations_are_rejected() {
        assert!(parse_duration("30").is_err());
        assert!(parse_duration("m30").is_err());
        assert!(parse_duration("30d").is_err());
        assert!(parse_duration("").is_err());
    }

    #[test]
    fn defaults_match_scheduled_run_expectations() {
        let cli = Cli::parse_from(["relic"]);
        assert_eq!(cli.days, 7);
        assert_eq!(cli.log_retention, 30);
        assert_eq!(cli.walkers, 1);
        assert_eq!(cli.queue_size, 300);
        assert_eq!(cli.max_files, 0);
        assert_eq!(cli.max_runtime, Duration::from_secs(1800));
        assert_eq!(cli.cooldown, Duration::ZERO);
        assert_eq!(cli.retries, 2);
        assert!(!cli.no_logs);
        assert!(!cli.init_config);
    }

    #[test]
    fn resource_flags_reject_zero() {
        assert!(Cli::try_parse_from(["relic", "--walkers", "0"]).is_err());
        assert!(Cli::try_parse_from(["relic", "--queue-size", "0"]).is_err());
        assert!(Cli::try_parse_from(["relic", "--log-retention", "0"]).is_err());
    }
}
