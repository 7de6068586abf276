// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Errors reported by the `rpl` CLI.
#[derive(Debug, Error)]
pub enum Error {
    #[error("daemon is not running\n  hint: start it with `rpl start`")]
    DaemonNotRunning,

    #[error("daemon error: {0}")]
    Daemon(String),

    #[error("daemon version mismatch: daemon is v{daemon_version}, CLI is v{cli_version}")]
    DaemonVersionMismatch {
        daemon_version: String,
        cli_version: String,
    },

    #[error("unexpected response from daemon: {0}")]
    UnexpectedResponse(String),

    #[error("replication failed for agent '{agent}': {status}")]
    ReplicationFailed { agent: String, status: String },

    #[error("ipc error: {0}")]
    Frame(#[from] rpl_ipc::framing::FrameError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A type alias for `Result<T, rpl_cli::Error>`.
pub type Result<T> = std::result::Result<T, Error>;
