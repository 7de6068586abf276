// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Errors surfaced by a replication agent to its callers.
///
/// Failures local to one package (placement, import, event emission) never
/// show up here; they are contained inside the agent.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent '{agent}' could not execute request: {source}")]
    Execution {
        agent: String,
        source: rpl_core::Error,
    },

    #[error("agent '{agent}' cannot access queue '{queue}': {source}")]
    Queue {
        agent: String,
        queue: String,
        source: rpl_core::Error,
    },

    #[error("agent '{agent}' cannot register trigger handler '{handler_id}': {source}")]
    Trigger {
        agent: String,
        handler_id: String,
        source: rpl_core::Error,
    },

    #[error("agent '{agent}' cannot enable queue processing: {source}")]
    QueueProcessing {
        agent: String,
        source: rpl_core::Error,
    },

    #[error("agent is missing a required component: {0}")]
    MissingComponent(&'static str),

    #[error("invalid agent name: '{0}'\n  hint: agent names must not be empty")]
    InvalidName(String),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
