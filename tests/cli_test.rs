//! Integration tests for the ATM CLI.
//!
//! These tests run the actual binary against scripted stdin, with PIN and
//! log files in a temporary directory.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Build a command whose PIN and log files live in `dir`
fn atm_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("atm-sim").unwrap();
    cmd.arg("--pin-file")
        .arg(dir.join("pin.txt"))
        .arg("--log-file")
        .arg(dir.join("transaction.log"));
    cmd
}

#[test]
fn test_withdraw_session_appends_log_line() {
    let dir = tempdir().unwrap();

    atm_cmd(dir.path())
        .write_stdin("1234\nA\n500\nE\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Remaining balance: Rs9500.78"))
        .stdout(predicate::str::contains("EXITING. Thank you!"));

    let log = fs::read_to_string(dir.path().join("transaction.log")).unwrap();
    assert_eq!(log.lines().count(), 1);
    assert!(log.starts_with("Transaction: A - Time: "));
}

#[test]
fn test_changed_pin_survives_restart() {
    let dir = tempdir().unwrap();

    atm_cmd(dir.path())
        .write_stdin("1234\nE\n2580\n2580\nE\n")
        .assert()
        .success();
    assert_eq!(fs::read_to_string(dir.path().join("pin.txt")).unwrap(), "2580");

    atm_cmd(dir.path())
        .write_stdin("1234\n2580\nC\nE\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid PIN. Please try again."))
        .stdout(predicate::str::contains("Rs10000.78"));
}

#[test]
fn test_closed_stdin_exits_normally() {
    let dir = tempdir().unwrap();

    atm_cmd(dir.path()).write_stdin("").assert().success();
}

#[test]
fn test_accounts_flag_overrides_seeds() {
    let dir = tempdir().unwrap();

    atm_cmd(dir.path())
        .args(["--account", "50:1", "--account", "0:2"])
        .args(["--cardholder", "1", "--receiver", "2"])
        .write_stdin("1234\nD\n20\nE\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sender's remaining balance: Rs30.00"))
        .stdout(predicate::str::contains("Receiver's new balance: Rs20.00"));
}

#[test]
fn test_accounts_csv_file() {
    let dir = tempdir().unwrap();
    let csv = dir.path().join("accounts.csv");
    fs::write(&csv, "balance,account\n75.25,900\n").unwrap();

    atm_cmd(dir.path())
        .arg("--accounts")
        .arg(&csv)
        .args(["--cardholder", "900"])
        .write_stdin("1234\nc\ne\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Current Balance for Account 900: Rs75.25"));
}

#[test]
fn test_unknown_cardholder_fails() {
    let dir = tempdir().unwrap();

    atm_cmd(dir.path())
        .args(["--cardholder", "000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cardholder account 000000"));
}

#[test]
fn test_lockout_after_max_attempts() {
    let dir = tempdir().unwrap();

    atm_cmd(dir.path())
        .args(["--max-pin-attempts", "3"])
        .write_stdin("1\n2\n3\n1234\nA\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Too many incorrect attempts"))
        .stdout(predicate::str::contains("A. Withdraw").not());
}
