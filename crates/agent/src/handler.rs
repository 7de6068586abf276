// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Callbacks an agent hands to its triggers and its queue provider.
//!
//! Both run out-of-band on threads owned by someone else, so they open their
//! own agent-scoped context and never let a failure escape.

use std::sync::Arc;

use rpl_core::{QueueProcessor, ReplicationQueueItem, ReplicationRequest, TriggerRequestHandler};

use crate::agent::AgentCore;

/// Runs trigger-fired requests through the agent.
pub(crate) struct AgentTriggerHandler {
    core: Arc<AgentCore>,
}

impl AgentTriggerHandler {
    pub(crate) fn new(core: Arc<AgentCore>) -> Self {
        AgentTriggerHandler { core }
    }
}

impl TriggerRequestHandler for AgentTriggerHandler {
    fn handle(&self, request: ReplicationRequest) {
        if !self.core.is_enabled() {
            tracing::debug!(
                "agent {} is disabled, ignoring triggered request {}",
                self.core.name,
                request
            );
            return;
        }

        let ctx = match self.core.agent_context() {
            Ok(ctx) => ctx,
            Err(e) => {
                tracing::error!("error executing handler for agent {}: {}", self.core.name, e);
                return;
            }
        };

        if let Err(e) = self.core.execute(&ctx, &request) {
            tracing::error!("error executing handler: {}", e);
        }
    }
}

/// Drains queue items by importing their packages.
pub(crate) struct AgentQueueProcessor {
    core: Arc<AgentCore>,
}

impl AgentQueueProcessor {
    pub(crate) fn new(core: Arc<AgentCore>) -> Self {
        AgentQueueProcessor { core }
    }
}

impl QueueProcessor for AgentQueueProcessor {
    fn process(&self, queue_name: &str, item: &ReplicationQueueItem) -> bool {
        if !self.core.is_enabled() {
            tracing::debug!(
                "agent {} is disabled, leaving {} on queue {}",
                self.core.name,
                item.id,
                queue_name
            );
            return false;
        }

        tracing::info!("running package queue processor for queue {}", queue_name);
        self.core.process_queue_item(item)
    }
}
