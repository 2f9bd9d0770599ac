use std::fs;
use std::path::Path;
use std::process::Command;

#[test]
fn dump_writes_db_open_events_to_log_dir() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("sites.db");
    let log_dir = dir.path().join("logs");

    let output = Command::new(env!("CARGO_BIN_EXE_siteregistry_cli"))
        .arg(&db_path)
        .env("SITEREGISTRY_LOG_DIR", &log_dir)
        .output()
        .unwrap();

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("siteregistry_core ping=pong"));
    assert!(stdout.contains("siteregistry_core sites=0"));

    let logs = read_all_logs(&log_dir);
    assert!(logs.contains("event=db_open"), "log contents: {logs}");
    assert!(logs.contains("status=ok"), "log contents: {logs}");
}

#[test]
fn without_db_path_skips_logging() {
    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().join("logs");

    let output = Command::new(env!("CARGO_BIN_EXE_siteregistry_cli"))
        .env_remove("SITEREGISTRY_DB")
        .env("SITEREGISTRY_LOG_DIR", &log_dir)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(!log_dir.exists());
}

fn read_all_logs(log_dir: &Path) -> String {
    fs::read_dir(log_dir)
        .unwrap()
        .map(|entry| fs::read_to_string(entry.unwrap().path()).unwrap_or_default())
        .collect()
}
