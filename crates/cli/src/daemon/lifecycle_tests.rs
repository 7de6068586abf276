// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use tempfile::tempdir;

use super::lifecycle::*;
use crate::error::Error;

#[test]
fn paths_live_in_the_state_dir() {
    let dir = tempdir().unwrap();
    assert_eq!(get_socket_path(dir.path()), dir.path().join("daemon.sock"));
    assert_eq!(get_pid_path(dir.path()), dir.path().join("daemon.pid"));
}

#[test]
fn detect_daemon_without_socket() {
    let dir = tempdir().unwrap();
    assert!(detect_daemon(dir.path()).unwrap().is_none());
}

#[test]
fn detect_daemon_cleans_up_stale_socket() {
    let dir = tempdir().unwrap();
    let socket_path = get_socket_path(dir.path());
    let pid_path = get_pid_path(dir.path());
    std::fs::write(&socket_path, "stale").unwrap();
    std::fs::write(&pid_path, "12345").unwrap();

    assert!(detect_daemon(dir.path()).unwrap().is_none());

    assert!(!socket_path.exists());
    assert!(!pid_path.exists());
}

#[test]
fn detect_daemon_cleans_up_stale_pid() {
    let dir = tempdir().unwrap();
    let pid_path = get_pid_path(dir.path());
    std::fs::write(&pid_path, "12345").unwrap();

    assert!(detect_daemon(dir.path()).unwrap().is_none());
    assert!(!pid_path.exists());
}

#[test]
fn stop_without_daemon_reports_not_running() {
    let dir = tempdir().unwrap();
    let err = stop_daemon(dir.path()).unwrap_err();
    assert!(matches!(err, Error::DaemonNotRunning));
}
