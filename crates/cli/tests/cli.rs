// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn rpl(state_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rpl").unwrap();
    cmd.arg("--state-dir")
        .arg(state_dir.path())
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn help_lists_commands() {
    Command::cargo_bin("rpl")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("execute"))
        .stdout(predicate::str::contains("queue"));
}

#[test]
fn status_without_daemon() {
    let dir = TempDir::new().unwrap();
    rpl(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout("Status: not running\n");
}

#[test]
fn stop_without_daemon() {
    let dir = TempDir::new().unwrap();
    rpl(&dir)
        .arg("stop")
        .assert()
        .success()
        .stdout("Daemon is not running.\n");
}

#[test]
fn agent_commands_need_a_daemon() {
    let dir = TempDir::new().unwrap();
    rpl(&dir)
        .args(["execute", "publish", "add", "/content/a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("daemon is not running"));
}

#[test]
fn invalid_action_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    rpl(&dir)
        .args(["execute", "publish", "copy", "/content/a"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid action"));
}
