// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: spawn, detect, stop.
//!
//! rpld runs in the background and keeps its PID file and socket in the
//! state directory (`~/.local/state/rpl/` by default).

use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::env;
use crate::error::{Error, Result};

use super::client::DaemonClient;

const SOCKET_NAME: &str = "daemon.sock";
const PID_NAME: &str = "daemon.pid";
const DAEMON_BINARY: &str = "rpld";

/// A running daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonInfo {
    pub pid: u32,
}

pub fn get_socket_path(state_dir: &Path) -> PathBuf {
    state_dir.join(SOCKET_NAME)
}

pub fn get_pid_path(state_dir: &Path) -> PathBuf {
    state_dir.join(PID_NAME)
}

/// Returns the running daemon, if one answers a ping.
///
/// Leftover socket and PID files of a dead daemon are removed.
pub fn detect_daemon(state_dir: &Path) -> Result<Option<DaemonInfo>> {
    let socket_path = get_socket_path(state_dir);
    let pid_path = get_pid_path(state_dir);

    if !socket_path.exists() {
        if pid_path.exists() {
            let _ = fs::remove_file(&pid_path);
        }
        return Ok(None);
    }

    let alive = DaemonClient::connect(&socket_path)
        .and_then(|client| client.ping())
        .is_ok();
    if !alive {
        cleanup_stale_files(state_dir);
        return Ok(None);
    }

    // A daemon that answers but has no PID file yet is still starting.
    Ok(read_pid_file(&pid_path)
        .filter(|pid| *pid > 0)
        .map(|pid| DaemonInfo { pid }))
}

fn find_daemon_binary() -> PathBuf {
    if let Some(path) = env::daemon_binary() {
        return path;
    }
    if let Ok(exe) = std::env::current_exe() {
        let sibling = exe.with_file_name(DAEMON_BINARY);
        if sibling.exists() {
            return sibling;
        }
    }
    PathBuf::from(DAEMON_BINARY)
}

/// Starts rpld for `state_dir` unless one is already running, and waits
/// until it accepts requests.
pub fn spawn_daemon(state_dir: &Path, config: Option<&Path>) -> Result<DaemonInfo> {
    if let Some(info) = detect_daemon(state_dir)? {
        return Ok(info);
    }
    fs::create_dir_all(state_dir)?;

    let binary = find_daemon_binary();
    let mut command = Command::new(&binary);
    command.arg("--state-dir").arg(state_dir);
    if let Some(config) = config {
        command.arg("--config").arg(config);
    }
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            Error::Daemon(format!(
                "failed to start rpld ({}): {}",
                binary.display(),
                e
            ))
        })?;

    // rpld prints READY once its socket is bound.
    if let Some(stdout) = child.stdout.take() {
        for line in BufReader::new(stdout).lines() {
            match line {
                Ok(line) if line == "READY" => break,
                Ok(_) => continue,
                Err(_) => break,
            }
        }
    }

    for _ in 0..150 {
        if let Ok(Some(status)) = child.try_wait() {
            let mut stderr_output = String::new();
            if let Some(mut stderr) = child.stderr.take() {
                let _ = stderr.read_to_string(&mut stderr_output);
            }
            return Err(Error::Daemon(format!(
                "daemon process exited with status: {}\n{}",
                status,
                stderr_output.trim()
            )));
        }
        if let Some(info) = detect_daemon(state_dir)? {
            return Ok(info);
        }
        std::thread::sleep(Duration::from_millis(10));
    }

    Err(Error::Daemon(
        "daemon failed to start: could not connect after multiple attempts".to_string(),
    ))
}

/// Asks the daemon to shut down, killing it if it does not answer.
pub fn stop_daemon(state_dir: &Path) -> Result<()> {
    let pid = read_pid_file(&get_pid_path(state_dir));

    let graceful =
        DaemonClient::connect(&get_socket_path(state_dir)).and_then(|client| client.shutdown());
    match (graceful, pid) {
        (Ok(()), Some(pid)) => wait_for_process_exit(pid, Duration::from_secs(1)),
        (Ok(()), None) => {}
        (Err(_), Some(pid)) => {
            let _ = Command::new("kill").arg("-9").arg(pid.to_string()).output();
            std::thread::sleep(Duration::from_millis(100));
        }
        (Err(e), None) => return Err(e),
    }

    cleanup_stale_files(state_dir);
    Ok(())
}

fn cleanup_stale_files(state_dir: &Path) {
    let _ = fs::remove_file(get_socket_path(state_dir));
    let _ = fs::remove_file(get_pid_path(state_dir));
}

fn read_pid_file(pid_path: &Path) -> Option<u32> {
    fs::read_to_string(pid_path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
}

fn wait_for_process_exit(pid: u32, timeout: Duration) {
    let start = Instant::now();
    while start.elapsed() < timeout {
        match Command::new("kill").arg("-0").arg(pid.to_string()).output() {
            Ok(output) if !output.status.success() => return,
            Err(_) => return,
            _ => {}
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}
