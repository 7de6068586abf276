// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Turns IPC requests into agent calls.

use std::time::Instant;

use rpl_agent::SimpleReplicationAgent;
use rpl_core::{ExecutionContext, ReplicationRequest};
use rpl_core::ReplicationQueue;
use rpl_ipc::{
    DaemonRequest, DaemonResponse, DaemonStatus, QueueEntry, QueueSnapshot, DEFAULT_QUEUE_LIMIT,
    MAX_QUEUE_LIMIT, PROTOCOL_VERSION,
};

use crate::registry::Registry;

pub fn handle_request(
    registry: &Registry,
    started: Instant,
    request: DaemonRequest,
) -> DaemonResponse {
    match request {
        DaemonRequest::Ping => DaemonResponse::Pong,
        DaemonRequest::Hello { version } => {
            if version != PROTOCOL_VERSION {
                tracing::warn!(
                    "client version {} differs from daemon version {}",
                    version,
                    PROTOCOL_VERSION
                );
            }
            DaemonResponse::Hello {
                version: PROTOCOL_VERSION.to_string(),
            }
        }
        DaemonRequest::Status => DaemonResponse::Status(DaemonStatus::new(
            std::process::id(),
            started.elapsed().as_secs(),
            registry.status(),
        )),
        DaemonRequest::Shutdown => DaemonResponse::ShuttingDown,
        DaemonRequest::Execute {
            agent,
            principal,
            action,
            paths,
        } => with_agent(registry, &agent, |agent| {
            let principal = principal.unwrap_or_else(|| agent.service_name().to_string());
            let ctx = ExecutionContext::new(principal);
            let request = ReplicationRequest::new(action, paths);
            match agent.execute(&ctx, &request) {
                Ok(response) => DaemonResponse::Executed { response },
                Err(e) => DaemonResponse::error(e.to_string()),
            }
        }),
        DaemonRequest::Enable { agent } => with_agent(registry, &agent, |agent| {
            match agent.enable() {
                Ok(()) => DaemonResponse::Ok,
                Err(e) => DaemonResponse::error(e.to_string()),
            }
        }),
        DaemonRequest::Disable { agent } => with_agent(registry, &agent, |agent| {
            agent.disable();
            DaemonResponse::Ok
        }),
        DaemonRequest::Queue {
            agent,
            queue,
            offset,
            limit,
        } => with_agent(registry, &agent, |agent| {
            match agent.queue(queue.as_deref()) {
                Ok(queue) => {
                    let limit = limit.unwrap_or(DEFAULT_QUEUE_LIMIT).min(MAX_QUEUE_LIMIT);
                    DaemonResponse::Queue(snapshot(agent.name(), queue.as_ref(), offset, limit))
                }
                Err(e) => DaemonResponse::error(e.to_string()),
            }
        }),
    }
}

/// Reports up to `limit` items of `queue`, skipping the first `offset`.
fn snapshot(
    agent: &str,
    queue: &dyn ReplicationQueue,
    offset: usize,
    limit: usize,
) -> QueueSnapshot {
    let items = queue.items();
    QueueSnapshot {
        agent: agent.to_string(),
        queue: queue.name().to_string(),
        total: items.len(),
        offset,
        entries: items
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|item| QueueEntry {
                state: queue.status(&item.id),
                item,
            })
            .collect(),
    }
}

fn with_agent<F>(registry: &Registry, name: &str, f: F) -> DaemonResponse
where
    F: FnOnce(&SimpleReplicationAgent) -> DaemonResponse,
{
    match registry.get(name) {
        Some(agent) => f(agent),
        None => DaemonResponse::error(format!(
            "unknown agent: '{}'\n  hint: run `rpl status` to list configured agents",
            name
        )),
    }
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
