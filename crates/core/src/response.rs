// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::queue::{ItemState, QueueItemState};

/// Caller-visible result of executing a replication request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicationResponse {
    pub status: String,
    pub successful: bool,
}

impl ReplicationResponse {
    pub fn new(status: impl Into<String>, successful: bool) -> Self {
        ReplicationResponse {
            status: status.into(),
            successful,
        }
    }

    /// The response for a placement that did not happen.
    pub fn error() -> Self {
        ReplicationResponse::new(ItemState::Error.as_str(), false)
    }
}

impl From<&QueueItemState> for ReplicationResponse {
    fn from(state: &QueueItemState) -> Self {
        ReplicationResponse::new(state.item_state.as_str(), state.successful)
    }
}

impl fmt::Display for ReplicationResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = if self.successful { "ok" } else { "failed" };
        if self.status.is_empty() {
            write!(f, "{outcome}")
        } else {
            write!(f, "{outcome} ({})", self.status)
        }
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
