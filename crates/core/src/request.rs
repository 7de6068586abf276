// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Replication requests and their actions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// What a replication request asks the destination to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Create or update content at the destination.
    Add,
    /// Remove content from the destination.
    Delete,
    /// Ask a remote source for pending packages.
    Poll,
}

impl Action {
    /// Returns the canonical upper-case name of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Add => "ADD",
            Action::Delete => "DELETE",
            Action::Poll => "POLL",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "add" => Ok(Action::Add),
            "delete" => Ok(Action::Delete),
            "poll" => Ok(Action::Poll),
            _ => Err(Error::InvalidAction(s.to_string())),
        }
    }
}

/// A request to propagate content changes.
///
/// Requests are immutable once created: fields are only reachable through
/// accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicationRequest {
    created_at: DateTime<Utc>,
    action: Action,
    paths: Vec<String>,
}

impl ReplicationRequest {
    /// Creates a request stamped with the current time.
    pub fn new<I, S>(action: Action, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::at(Utc::now(), action, paths)
    }

    /// Creates a request with an explicit creation time.
    pub fn at<I, S>(created_at: DateTime<Utc>, action: Action, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ReplicationRequest {
            created_at,
            action,
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }
}

impl fmt::Display for ReplicationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] at {}",
            self.action,
            self.paths.join(", "),
            self.created_at.to_rfc3339()
        )
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
