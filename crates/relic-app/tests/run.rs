//! Wiring tests for the full boot sequence against a real filesystem.

use std::ffi::OsString;
use std::path::Path;
use std::time::{Duration, SystemTime};

use clap::Parser as _;
use filetime::FileTime;
use relic_app::{AppError, Cli, run_with};
use relic_notify::RecordingNotifier;
use tempfile::TempDir;

fn cli(args: &[(&str, &Path)], switches: &[&str]) -> Cli {
    let mut argv: Vec<OsString> = vec![OsString::from("relic")];
    for (flag, value) in args {
        argv.push(OsString::from(flag));
        argv.push(value.as_os_str().to_os_string());
    }
    for switch in switches {
        argv.push(OsString::from(switch));
    }
    Cli::parse_from(argv)
}

fn backdate(path: &Path, days: u64) {
    let past = SystemTime::now() - Duration::from_secs(days * 86_400);
    filetime::set_file_mtime(path, FileTime::from_system_time(past)).expect("set mtime");
}

fn write_config(config_dir: &Path, backup_root: &Path, roots: &[(&Path, &str)]) {
    std::fs::create_dir_all(config_dir).expect("create config dir");
    let mut content = format!("[backup]\npath={}\n\n[paths]\n", backup_root.display());
    for (path, flag) in roots {
        content.push_str(&format!("{}, {flag}\n", path.display()));
    }
    std::fs::write(config_dir.join("config.ini"), content).expect("write config.ini");
}

#[tokio::test]
async fn full_run_cleans_sources_writes_logs_and_prunes() {
    let fixture = TempDir::new().expect("tempdir");
    let config_dir = fixture.path().join("config");
    let log_dir = fixture.path().join("logs");
    let src = fixture.path().join("src");
    let bk = fixture.path().join("bk");
    std::fs::create_dir_all(&bk).expect("create backup root");

    let old_file = src.join("report.txt");
    std::fs::create_dir_all(&src).expect("create src");
    std::fs::write(&old_file, b"old payload").expect("write file");
    backdate(&old_file, 10);

    std::fs::create_dir_all(&log_dir).expect("create log dir");
    let stale_log = log_dir.join("maintenance_2025-01-01.log");
    std::fs::write(&stale_log, b"stale").expect("write stale log");
    backdate(&stale_log, 90);

    write_config(&config_dir, &bk, &[(&src, "yes")]);

    let notifier = RecordingNotifier::default();
    let args = cli(
        &[("--config-dir", &config_dir), ("--log-dir", &log_dir)],
        &[],
    );
    run_with(args, &notifier).await.expect("run should succeed");

    assert!(!old_file.exists(), "aged source must be deleted");
    assert!(notifier.messages().is_empty(), "no popup on success");

    // One dated folder under the backup root holds the copy.
    let dated = std::fs::read_dir(&bk)
        .expect("read backup root")
        .filter_map(Result::ok)
        .find(|entry| entry.file_type().is_ok_and(|kind| kind.is_dir()))
        .expect("dated folder present");
    let copied = dated.path().join("report.txt");
    assert_eq!(std::fs::read(&copied).expect("read backup"), b"old payload");

    assert!(!stale_log.exists(), "stale log must be pruned");
    let has_run_log = std::fs::read_dir(&log_dir)
        .expect("read log dir")
        .filter_map(Result::ok)
        .any(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .starts_with("maintenance_")
        });
    assert!(has_run_log, "the run itself must produce a daily log");
}

#[tokio::test]
async fn gate_failure_notifies_and_deletes_nothing() {
    let fixture = TempDir::new().expect("tempdir");
    let config_dir = fixture.path().join("config");
    let src = fixture.path().join("src");
    let bogus_backup = fixture.path().join("backup-as-file");
    std::fs::write(&bogus_backup, b"not a directory").expect("write file");

    let old_file = src.join("precious.txt");
    std::fs::create_dir_all(&src).expect("create src");
    std::fs::write(&old_file, b"data").expect("write file");
    backdate(&old_file, 10);

    write_config(&config_dir, &bogus_backup, &[(&src, "yes")]);

    let notifier = RecordingNotifier::default();
    let args = cli(&[("--config-dir", &config_dir)], &["--no-logs"]);
    let err = run_with(args, &notifier).await.expect_err("gate must abort");

    assert!(matches!(
        err,
        AppError::Engine {
            operation: "backup.gate",
            ..
        }
    ));
    assert!(old_file.exists(), "nothing may be deleted after a gate failure");

    let messages = notifier.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].0, "Backup Location Error");
}

#[tokio::test]
async fn delete_only_mode_skips_the_gate() {
    let fixture = TempDir::new().expect("tempdir");
    let config_dir = fixture.path().join("config");
    let src = fixture.path().join("src");
    // Deliberately nonexistent: with backup disabled everywhere, the gate
    // must not even look at it.
    let missing_backup = fixture.path().join("never-created");

    let old_file = src.join("junk.txt");
    std::fs::create_dir_all(&src).expect("create src");
    std::fs::write(&old_file, b"junk").expect("write file");
    backdate(&old_file, 10);

    write_config(&config_dir, &missing_backup, &[(&src, "no")]);

    let notifier = RecordingNotifier::default();
    let args = cli(&[("--config-dir", &config_dir)], &["--no-logs"]);
    run_with(args, &notifier)
        .await
        .expect("delete-only run should succeed");

    assert!(!old_file.exists());
    assert!(!missing_backup.exists());
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn missing_config_is_a_configuration_error() {
    let fixture = TempDir::new().expect("tempdir");
    let config_dir = fixture.path().join("config");
    std::fs::create_dir_all(&config_dir).expect("create config dir");

    let notifier = RecordingNotifier::default();
    let args = cli(&[("--config-dir", &config_dir)], &["--no-logs"]);
    let err = run_with(args, &notifier).await.expect_err("must fail");
    assert!(matches!(err, AppError::Config { .. }));
}

#[tokio::test]
async fn init_config_writes_a_sample_exactly_once() {
    let fixture = TempDir::new().expect("tempdir");
    let config_dir = fixture.path().join("config");

    let notifier = RecordingNotifier::default();
    let args = cli(&[("--config-dir", &config_dir)], &["--init-config"]);
    run_with(args, &notifier)
        .await
        .expect("sample write should succeed");
    assert!(config_dir.join("config.ini").exists());

    let again = cli(&[("--config-dir", &config_dir)], &["--init-config"]);
    let err = run_with(again, &notifier)
        .await
        .expect_err("second init must refuse to overwrite");
    assert!(matches!(err, AppError::Config { .. }));
}
