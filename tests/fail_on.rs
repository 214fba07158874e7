use std::path::Path;
use std::io::Write;
use std::process::{Command, Stdio};

use cadence_core::Severity;

fn write_solo_history(dir: &Path) -> std::path::PathBuf {
    let commits: Vec<serde_json::Value> = (0..14)
        .map(|day| {
            serde_json::json!({
                "id": format!("c{day:03}"),
                "author": "alice",
                "timestamp": format!("2024-03-{:02}T10:00:00Z", day + 1),
                "files": [{ "path": "src/lib.rs", "insertions": 12, "deletions": 3 }],
            })
        })
        .collect();
    let path = dir.join("history.json");
    std::fs::write(&path, serde_json::to_string(&commits).unwrap()).unwrap();
    path
}

#[test]
fn fail_on_exits_zero_when_no_matching_severity() {
    // Simulate: only low and medium issues, threshold is high
    let issues = vec![Severity::Low, Severity::Medium];
    let threshold = Severity::High;

    let has_issues = issues.iter().any(|s| s.meets_threshold(threshold));
    assert!(!has_issues, "should not fail when nothing reaches high");
}

#[test]
fn fail_on_high_catches_high_and_critical() {
    let threshold = Severity::High;

    assert!(Severity::Critical.meets_threshold(threshold));
    assert!(Severity::High.meets_threshold(threshold));
    assert!(!Severity::Medium.meets_threshold(threshold));
    assert!(!Severity::Low.meets_threshold(threshold));
}

#[test]
fn sole_contributor_trips_fail_on_critical() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_solo_history(dir.path());

    let output = Command::new(env!("CARGO_BIN_EXE_cadence"))
        .args(["analyze", "--repo", "acme/api", "--format", "json", "--fail-on", "critical"])
        .arg("--log")
        .arg(&log)
        .args(["--now", "2024-03-15T00:00:00Z"])
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["repository"], "acme/api");
    assert_eq!(report["totalCommits"], 14);
    assert_eq!(report["health"]["collaboration"]["busFactor"], 1);
}

#[test]
fn analyze_without_fail_on_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_solo_history(dir.path());

    let output = Command::new(env!("CARGO_BIN_EXE_cadence"))
        .args(["analyze", "--repo", "acme/api", "--format", "markdown"])
        .arg("--log")
        .arg(&log)
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success(), "analyze failed: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("# Team Analytics: acme/api"));
    assert!(stdout.contains("| alice |"));
}

#[test]
fn missing_log_is_an_error() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_cadence"))
        .args(["trends", "--repo", "acme/api", "--log", "nope.json"])
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
}

#[test]
fn trends_reads_commit_log_from_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_solo_history(dir.path());
    let content = std::fs::read(&log).unwrap();

    let mut child = Command::new(env!("CARGO_BIN_EXE_cadence"))
        .args(["trends", "--repo", "acme/api", "--format", "json"])
        .current_dir(dir.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(&content).unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success(), "trends failed: {}", String::from_utf8_lossy(&output.stderr));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["repository"], "acme/api");
    assert_eq!(report["daily"].as_array().unwrap().len(), 14);
    assert_eq!(report["trends"]["points"], 14);
}
