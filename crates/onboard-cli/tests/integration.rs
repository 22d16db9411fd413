#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn onboard(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("onboard").unwrap();
    cmd.current_dir(dir.path())
        .env("ONBOARD_CONFIG", dir.path().join("onboarding.yaml"))
        .env_remove("GITHUB_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

// ---------------------------------------------------------------------------
// onboard resolve
// ---------------------------------------------------------------------------

#[test]
fn resolve_first_milestone() {
    let dir = TempDir::new().unwrap();
    onboard(&dir)
        .args(["resolve", "--days", "95"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Action: comment"))
        .stdout(predicate::str::contains("onboarding/incomplete"));
}

#[test]
fn resolve_young_issue_has_no_action() {
    let dir = TempDir::new().unwrap();
    onboard(&dir)
        .args(["resolve", "--days", "80"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Action: none"));
}

#[test]
fn resolve_json_final_month_window() {
    let dir = TempDir::new().unwrap();
    let value = stdout_json(onboard(&dir).args(["--json", "resolve", "--days", "335"]));
    assert_eq!(value["time"]["months"], 11);
    assert_eq!(value["rule"], "final_month_weekly");
    assert_eq!(value["action"]["action"], "weekly_warning");
    assert_eq!(value["action"]["label"], "onboarding/approaching-archival");
    assert_eq!(value["action"]["week_in_month"], 1);
}

#[test]
fn resolve_from_creation_timestamp() {
    let dir = TempDir::new().unwrap();
    let value = stdout_json(onboard(&dir).args([
        "resolve",
        "--json",
        "--created-at",
        "2001-01-01T00:00:00Z",
    ]));
    assert_eq!(value["action"]["action"], "archive");
}

#[test]
fn resolve_rejects_bad_timestamp() {
    let dir = TempDir::new().unwrap();
    onboard(&dir)
        .args(["resolve", "--created-at", "last tuesday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn resolve_requires_exactly_one_age() {
    let dir = TempDir::new().unwrap();
    onboard(&dir).arg("resolve").assert().failure();
    onboard(&dir)
        .args(["resolve", "--days", "1", "--created-at", "2025-10-01T00:00:00Z"])
        .assert()
        .failure();
}

// ---------------------------------------------------------------------------
// onboard preview
// ---------------------------------------------------------------------------

#[test]
fn preview_renders_weekly_warning() {
    let dir = TempDir::new().unwrap();
    onboard(&dir)
        .args(["preview", "--project", "Foo", "--days", "335"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Onboarding Progress Alert for Foo"))
        .stdout(predicate::str::contains("Weekly Warning #1"));
}

#[test]
fn preview_before_first_milestone() {
    let dir = TempDir::new().unwrap();
    onboard(&dir)
        .args(["preview", "--project", "Foo", "--days", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No escalation for Foo"));
}

#[test]
fn preview_json_includes_comment() {
    let dir = TempDir::new().unwrap();
    let value = stdout_json(onboard(&dir).args([
        "preview", "-j", "--project", "Foo", "--days", "400",
    ]));
    assert_eq!(value["action"]["action"], "archive");
    assert!(value["comment"].as_str().unwrap().contains("onboarding/archived"));
}

// ---------------------------------------------------------------------------
// onboard config
// ---------------------------------------------------------------------------

#[test]
fn config_init_writes_defaults_once() {
    let dir = TempDir::new().unwrap();
    onboard(&dir).args(["config", "init"]).assert().success();
    let content = std::fs::read_to_string(dir.path().join("onboarding.yaml")).unwrap();
    assert!(content.contains("sandbox"));
    assert!(content.contains("review/health"));

    onboard(&dir)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    onboard(&dir)
        .args(["config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn config_show_without_file_prints_defaults() {
    let dir = TempDir::new().unwrap();
    let value = stdout_json(onboard(&dir).args(["config", "show", "--json"]));
    assert_eq!(value["repo"]["owner"], "cncf");
    assert_eq!(value["health_repo"]["name"], "toc");
    assert_eq!(value["monitor"]["title_prefix"], "[PROJECT ONBOARDING]");
}

#[test]
fn config_validate_default_only_warns() {
    let dir = TempDir::new().unwrap();
    onboard(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[warning]"));
}

#[test]
fn config_validate_reports_errors() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("onboarding.yaml"),
        "monitor:\n  required_labels: []\n",
    )
    .unwrap();
    onboard(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error]"))
        .stderr(predicate::str::contains("config validation found errors"));
}

#[test]
fn explicit_config_flag_wins() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("other.yaml"),
        "repo:\n  owner: example\n  name: onboarding\n",
    )
    .unwrap();
    let value = stdout_json(onboard(&dir).args([
        "--config",
        "other.yaml",
        "config",
        "show",
        "--json",
    ]));
    assert_eq!(value["repo"]["owner"], "example");
}

// ---------------------------------------------------------------------------
// Commands that talk to GitHub
// ---------------------------------------------------------------------------

#[test]
fn monitor_requires_token() {
    let dir = TempDir::new().unwrap();
    onboard(&dir)
        .arg("monitor")
        .assert()
        .failure()
        .stderr(predicate::str::contains("GITHUB_TOKEN"));
}

#[test]
fn monitor_refuses_invalid_config() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("onboarding.yaml"),
        "api_url: ftp://example.com\n",
    )
    .unwrap();
    onboard(&dir)
        .args(["monitor", "--token", "t0ken"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("api_url"));
}

#[test]
fn create_requires_token() {
    let dir = TempDir::new().unwrap();
    onboard(&dir)
        .args(["create", "--project", "Foo", "--vote-issue", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GITHUB_TOKEN"));
}
