// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop the daemon from starting.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("failed to read config {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    ParseConfig {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("cannot set up agent '{agent}': {source}")]
    Collaborator {
        agent: String,
        source: rpl_core::Error,
    },

    #[error("cannot start queue worker: {0}")]
    Worker(rpl_core::Error),

    #[error(transparent)]
    Agent(#[from] rpl_agent::AgentError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DaemonError>;
