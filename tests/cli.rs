use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

// Each test gets its own HOME so settings and database land in a tempdir.
fn budget(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("easybudget").unwrap();
    cmd.env("HOME", home);
    cmd
}

#[test]
fn test_init_add_day_and_balance() {
    let home = tempfile::tempdir().unwrap();
    budget(home.path())
        .args(["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized easybudget"));

    budget(home.path())
        .args(["add", "2025-01-15", "-12.34", "--note", "coffee"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-$12.34"));

    budget(home.path())
        .args(["day", "2025-01-15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("coffee"));

    budget(home.path())
        .args(["balance", "2025-01-31"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-$12.34"));
}

#[test]
fn test_rule_expansion_and_cascade() {
    let home = tempfile::tempdir().unwrap();
    budget(home.path()).args(["init"]).assert().success();

    budget(home.path())
        .args([
            "rules", "add", "2025-01-01", "-50", "--note", "rent", "--unit", "month",
            "--through", "2025-04-01",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("4 entries"));

    budget(home.path())
        .args(["rules", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-04-01"));

    budget(home.path())
        .args(["rules", "rm", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("4 generated entries"));

    budget(home.path())
        .args(["balance", "2025-12-31"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$0.00"));
}

#[test]
fn test_invalid_unit_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    budget(home.path()).args(["init"]).assert().success();

    budget(home.path())
        .args(["rules", "add", "2025-01-01", "-50", "--unit", "year"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid unit"));
}

#[test]
fn test_invalid_date_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    budget(home.path()).args(["init"]).assert().success();

    budget(home.path())
        .args(["add", "01/15/2025", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}
