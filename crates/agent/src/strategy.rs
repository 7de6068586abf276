// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Distribution strategies deciding which queue an item lands on.

use std::fmt;
use std::str::FromStr;

use rpl_core::{
    DistributionStrategy, Error, ItemState, QueueItemState, QueueProvider, ReplicationQueueItem,
    Result, DEFAULT_QUEUE_NAME,
};
use serde::{Deserialize, Serialize};

use crate::auth::is_under;

/// Queue receiving items under a priority path.
pub const PRIORITY_QUEUE_NAME: &str = "priority";

/// Queue receiving items moved off a stuck default queue.
pub const ERROR_QUEUE_NAME: &str = "error";

/// Adds `item` to the agent's `queue_name` queue and reports its state there.
fn place(
    agent_name: &str,
    queue_name: &str,
    item: &ReplicationQueueItem,
    provider: &dyn QueueProvider,
) -> Result<Option<QueueItemState>> {
    let queue = provider.queue(agent_name, queue_name)?;
    if !queue.add(item.clone())? {
        tracing::error!("could not add item {} to queue {}", item.id, queue_name);
        return Ok(Some(QueueItemState::error()));
    }
    Ok(queue.status(&item.id))
}

/// Places every item on the agent's default queue.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleQueueStrategy;

impl DistributionStrategy for SingleQueueStrategy {
    fn add(
        &self,
        agent_name: &str,
        item: &ReplicationQueueItem,
        provider: &dyn QueueProvider,
    ) -> Result<Option<QueueItemState>> {
        place(agent_name, DEFAULT_QUEUE_NAME, item, provider)
    }
}

/// Routes items touching a priority path to a separate queue.
#[derive(Debug, Clone, Default)]
pub struct PriorityPathStrategy {
    prefixes: Vec<String>,
}

impl PriorityPathStrategy {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PriorityPathStrategy {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether any of the item's paths is under a priority prefix.
    pub fn is_priority(&self, item: &ReplicationQueueItem) -> bool {
        item.paths
            .iter()
            .any(|path| self.prefixes.iter().any(|prefix| is_under(prefix, path)))
    }
}

impl DistributionStrategy for PriorityPathStrategy {
    fn add(
        &self,
        agent_name: &str,
        item: &ReplicationQueueItem,
        provider: &dyn QueueProvider,
    ) -> Result<Option<QueueItemState>> {
        let queue_name = if self.is_priority(item) {
            PRIORITY_QUEUE_NAME
        } else {
            DEFAULT_QUEUE_NAME
        };
        place(agent_name, queue_name, item, provider)
    }
}

/// What to do with an item that keeps failing at the head of the queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StuckQueueHandling {
    /// Discard it.
    #[default]
    Drop,
    /// Move it to the error queue.
    Error,
}

impl StuckQueueHandling {
    pub fn as_str(&self) -> &'static str {
        match self {
            StuckQueueHandling::Drop => "drop",
            StuckQueueHandling::Error => "error",
        }
    }
}

impl fmt::Display for StuckQueueHandling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StuckQueueHandling {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "drop" => Ok(StuckQueueHandling::Drop),
            "error" => Ok(StuckQueueHandling::Error),
            _ => Err(Error::InvalidInput(format!(
                "invalid stuck queue handling: '{}'\n  hint: valid values are: drop, error",
                s
            ))),
        }
    }
}

/// Single queue strategy that unblocks the default queue.
///
/// Before placing an item, the head of the default queue is checked; once
/// it has failed more than `attempts_threshold` times it is taken off the
/// queue and handled per [`StuckQueueHandling`].
#[derive(Debug, Clone, Copy)]
pub struct ErrorAwareStrategy {
    attempts_threshold: u32,
    handling: StuckQueueHandling,
}

impl ErrorAwareStrategy {
    pub fn new(attempts_threshold: u32, handling: StuckQueueHandling) -> Self {
        ErrorAwareStrategy {
            attempts_threshold,
            handling,
        }
    }

    fn unblock(&self, agent_name: &str, provider: &dyn QueueProvider) -> Result<()> {
        let queue = provider.default_queue(agent_name)?;
        let Some(head) = queue.head() else {
            return Ok(());
        };
        let Some(state) = queue.status(&head.id) else {
            return Ok(());
        };
        // An active head belongs to the drain pass processing it.
        if state.item_state == ItemState::Active {
            return Ok(());
        }
        let attempts = state.attempts;
        if attempts <= self.attempts_threshold {
            return Ok(());
        }

        let Some(stuck) = queue.remove(&head.id) else {
            return Ok(());
        };
        match self.handling {
            StuckQueueHandling::Drop => {
                tracing::warn!(
                    "dropped item {} after {} failed attempts",
                    stuck.id,
                    attempts
                );
            }
            StuckQueueHandling::Error => {
                let id = stuck.id.clone();
                let moved = provider.queue(agent_name, ERROR_QUEUE_NAME)?.add(stuck)?;
                if moved {
                    tracing::warn!(
                        "moved item {} to queue {} after {} failed attempts",
                        id,
                        ERROR_QUEUE_NAME,
                        attempts
                    );
                } else {
                    tracing::error!("could not move item {} to queue {}", id, ERROR_QUEUE_NAME);
                }
            }
        }
        Ok(())
    }
}

impl DistributionStrategy for ErrorAwareStrategy {
    fn add(
        &self,
        agent_name: &str,
        item: &ReplicationQueueItem,
        provider: &dyn QueueProvider,
    ) -> Result<Option<QueueItemState>> {
        self.unblock(agent_name, provider)?;
        place(agent_name, DEFAULT_QUEUE_NAME, item, provider)
    }
}

#[cfg(test)]
#[path = "strategy_tests.rs"]
mod tests;
