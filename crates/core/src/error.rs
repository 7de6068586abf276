// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types shared by the replication model and its collaborators.

use thiserror::Error;

/// All errors raised by replication collaborators.
///
/// Collaborator traits (exporters, importers, queues, triggers, ...) report
/// failures with this type so the agent can decide which failures escalate
/// and which are contained.
#[derive(Debug, Error)]
pub enum Error {
    #[error("request not authorized: {0}")]
    NotAuthorized(String),

    #[error("could not build package: {0}")]
    PackageBuilding(String),

    #[error("could not read package: {0}")]
    PackageReading(String),

    #[error("could not import package: {0}")]
    PackageImport(String),

    #[error("queue error: {0}")]
    Queue(String),

    #[error("trigger error: {0}")]
    Trigger(String),

    #[error("event error: {0}")]
    Event(String),

    #[error("cannot obtain context for service '{service}': {reason}")]
    Login { service: String, reason: String },

    #[error("invalid action: '{0}'\n  hint: valid actions are: add, delete, poll")]
    InvalidAction(String),

    #[error(
        "invalid item state: '{0}'\n  hint: valid states are: queued, active, succeeded, error, dropped"
    )]
    InvalidItemState(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for replication operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
