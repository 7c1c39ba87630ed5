use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_command() {
    let mut cmd = Command::cargo_bin("rinkplan").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Training scheduling"))
        .stdout(predicate::str::contains("training"))
        .stdout(predicate::str::contains("locations"))
        .stdout(predicate::str::contains("groups"));
}

#[test]
fn test_training_help_lists_subcommands() {
    let mut cmd = Command::cargo_bin("rinkplan").unwrap();
    cmd.arg("training").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("new"))
        .stdout(predicate::str::contains("edit"))
        .stdout(predicate::str::contains("list"));
}

#[test]
fn test_version_command() {
    let mut cmd = Command::cargo_bin("rinkplan").unwrap();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_completions_command() {
    let mut cmd = Command::cargo_bin("rinkplan").unwrap();
    cmd.arg("completions").arg("bash");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("_rinkplan"));
}

#[test]
fn test_training_new_rejects_bad_date() {
    let mut cmd = Command::cargo_bin("rinkplan").unwrap();
    cmd.arg("training")
        .arg("new")
        .arg("--location")
        .arg("1")
        .arg("--date")
        .arg("05/08/2026");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid date"));
}
