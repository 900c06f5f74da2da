use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn create_file(root: &Path, rel_path: &str, content: &str) {
    let path = root.join(rel_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// `dirmirror <source> <replica> --once --no-config --log-path <tmp>/sync.log`
fn once(tmp: &TempDir, source: &Path, replica: &Path) -> Command {
    once_logging_to(&tmp.path().join("sync.log"), source, replica)
}

fn once_logging_to(log_path: &Path, source: &Path, replica: &Path) -> Command {
    let mut cmd = Command::cargo_bin("dirmirror").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("DIRMIRROR_SYNC_INTERVAL")
        .env_remove("DIRMIRROR_LOG_PATH")
        .arg(source)
        .arg(replica)
        .arg("--once")
        .arg("--no-config")
        .arg("--log-path")
        .arg(log_path);
    cmd
}

#[test]
fn test_help_output() {
    let mut cmd = Command::cargo_bin("dirmirror").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("SOURCE_PATH"))
        .stdout(predicate::str::contains("REPLICA_PATH"))
        .stdout(predicate::str::contains("--sync-interval"))
        .stdout(predicate::str::contains("--log-path"));
}

#[test]
fn test_version_output() {
    let mut cmd = Command::cargo_bin("dirmirror").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_missing_arguments() {
    let mut cmd = Command::cargo_bin("dirmirror").unwrap();
    cmd.assert().failure();
}

#[test]
fn test_once_mirrors_tree() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("source");
    let replica = tmp.path().join("replica");
    create_file(&source, "a.txt", "hello");
    create_file(&source, "sub/nested.txt", "x");

    once(&tmp, &source, &replica)
        .assert()
        .success()
        .stdout(predicate::str::contains("File copied: a.txt"))
        .stdout(predicate::str::contains("File copied: sub/nested.txt"));

    assert_eq!(fs::read_to_string(replica.join("a.txt")).unwrap(), "hello");
    assert_eq!(
        fs::read_to_string(replica.join("sub/nested.txt")).unwrap(),
        "x"
    );
}

#[test]
fn test_once_updates_and_deletes() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("source");
    let replica = tmp.path().join("replica");
    create_file(&source, "a.txt", "hello");
    create_file(&replica, "a.txt", "world");
    create_file(&replica, "old.txt", "x");

    once(&tmp, &source, &replica)
        .assert()
        .success()
        .stdout(predicate::str::contains("File updated: a.txt"))
        .stdout(predicate::str::contains("File deleted: old.txt"));

    assert_eq!(fs::read_to_string(replica.join("a.txt")).unwrap(), "hello");
    assert!(!replica.join("old.txt").exists());
}

#[test]
fn test_events_written_to_log_file() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("source");
    let replica = tmp.path().join("replica");
    create_file(&source, "a.txt", "hello");

    once(&tmp, &source, &replica).assert().success();

    let log = fs::read_to_string(tmp.path().join("sync.log")).unwrap();
    assert!(log.contains("Starting the sync process"));
    assert!(log.contains("File copied: a.txt"));
}

#[test]
fn test_dry_run_leaves_replica_untouched() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("source");
    let replica = tmp.path().join("replica");
    create_file(&source, "a.txt", "hello");
    fs::create_dir_all(&replica).unwrap();

    once(&tmp, &source, &replica)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("[DRY RUN]"));

    assert!(!replica.join("a.txt").exists());
}

#[test]
fn test_exclude_flag() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("source");
    let replica = tmp.path().join("replica");
    create_file(&source, "keep.txt", "k");
    create_file(&source, "skip.tmp", "s");

    once(&tmp, &source, &replica)
        .args(["--exclude", "*.tmp"])
        .assert()
        .success();

    assert!(replica.join("keep.txt").exists());
    assert!(!replica.join("skip.tmp").exists());
}

#[test]
fn test_missing_source_fails() {
    let tmp = TempDir::new().unwrap();

    once(&tmp, &tmp.path().join("nope"), &tmp.path().join("replica"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid source or replica path"));
}

#[test]
fn test_replica_inside_source_fails() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("source");
    create_file(&source, "a.txt", "hello");

    once(&tmp, &source, &source.join("mirror"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("inside the source"));
}

#[test]
fn test_log_path_inside_source_fails() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("source");
    let replica = tmp.path().join("replica");
    create_file(&source, "a.txt", "hello");

    once_logging_to(&source.join("sync.log"), &source, &replica)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid log path"))
        .stderr(predicate::str::contains("inside the source"));

    assert!(!source.join("sync.log").exists());
    assert!(!replica.join("a.txt").exists());
}

#[test]
fn test_log_path_inside_replica_fails() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("source");
    let replica = tmp.path().join("replica");
    create_file(&source, "a.txt", "hello");

    once_logging_to(&replica.join("sync.log"), &source, &replica)
        .assert()
        .failure()
        .stderr(predicate::str::contains("inside the replica"));

    assert!(!replica.join("sync.log").exists());
}

#[test]
fn test_default_log_path_inside_source_fails() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("source");
    create_file(&source, "a.txt", "hello");

    let mut cmd = Command::cargo_bin("dirmirror").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("DIRMIRROR_SYNC_INTERVAL")
        .env_remove("DIRMIRROR_LOG_PATH")
        .current_dir(&source)
        .arg(".")
        .arg("../replica")
        .arg("--once")
        .arg("--no-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("inside the source"));

    assert!(!source.join("sync.log").exists());
}

#[test]
fn test_repeated_runs_are_idempotent() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("source");
    let replica = tmp.path().join("replica");
    create_file(&source, "a.txt", "hello");

    once(&tmp, &source, &replica).assert().success();

    once(&tmp, &source, &replica)
        .assert()
        .success()
        .stdout(predicate::str::contains("File ").not());
}

#[test]
fn test_config_file_is_applied() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("source");
    let replica = tmp.path().join("replica");
    create_file(&source, "keep.txt", "k");
    create_file(&source, "build/out.bin", "o");
    let config = tmp.path().join("dirmirror.toml");
    fs::write(&config, "exclude = [\"build/\"]\n").unwrap();

    let mut cmd = Command::cargo_bin("dirmirror").unwrap();
    cmd.env_remove("RUST_LOG")
        .arg(&source)
        .arg(&replica)
        .arg("--once")
        .arg("--config")
        .arg(&config)
        .arg("--log-path")
        .arg(tmp.path().join("sync.log"))
        .assert()
        .success();

    assert!(replica.join("keep.txt").exists());
    assert!(!replica.join("build").exists());
}
