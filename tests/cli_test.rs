//! Binary smoke tests for the non-interactive commands

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Run the binary with its data and config directories inside `home`
fn heartgarden(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("heartgarden").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    heartgarden(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("moods"))
        .stdout(predicate::str::contains("tasks"));
}

#[test]
fn test_moods_marks_default() {
    let home = TempDir::new().unwrap();
    heartgarden(&home)
        .arg("moods")
        .assert()
        .success()
        .stdout(predicate::str::contains("Great"))
        .stdout(predicate::str::contains("Okay"))
        .stdout(predicate::str::contains("(default)"));
}

#[test]
fn test_moods_json() {
    let home = TempDir::new().unwrap();
    let output = heartgarden(&home).args(["moods", "--format", "json"]).output().unwrap();
    assert!(output.status.success());

    let moods: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let moods = moods.as_array().unwrap();
    assert_eq!(moods.len(), 5);
    assert_eq!(moods[2]["id"], "okay");
    assert_eq!(moods[2]["default"], true);
}

#[test]
fn test_tasks_for_category() {
    let home = TempDir::new().unwrap();
    heartgarden(&home)
        .args(["tasks", "sleep"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sleep Tasks"))
        .stdout(predicate::str::contains("Drink a glass of warm milk"));
}

#[test]
fn test_unknown_task_category_falls_back_to_exercise() {
    let home = TempDir::new().unwrap();
    heartgarden(&home)
        .args(["tasks", "juggling"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown category 'juggling'"))
        .stdout(predicate::str::contains("Exercise/Hobby Tasks"))
        .stdout(predicate::str::contains("Jump rope for 5 minutes"));
}

#[test]
fn test_config_prints_defaults() {
    let home = TempDir::new().unwrap();
    heartgarden(&home)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("model: gpt-4o-mini"))
        .stdout(predicate::str::contains("display-delay-ms: 1500"));
}

#[test]
fn test_chat_requires_api_key() {
    let home = TempDir::new().unwrap();
    heartgarden(&home)
        .arg("chat")
        .env_remove("OPENAI_API_KEY")
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}
