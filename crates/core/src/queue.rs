// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queueing contracts: queue items, queues, providers and strategies.
//!
//! The agent never talks to a queue directly when scheduling. It hands a
//! [`ReplicationQueueItem`] to a [`DistributionStrategy`], which decides
//! which of the queues a [`QueueProvider`] offers the item lands on. Draining
//! is driven by the provider, which calls back into a registered
//! [`QueueProcessor`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::package::{PackageInfo, ReplicationPackage};
use crate::request::Action;

/// Name of the queue every agent owns.
pub const DEFAULT_QUEUE_NAME: &str = "default";

/// Lifecycle of an item inside a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemState {
    /// Waiting to be processed.
    Queued,
    /// Currently being processed.
    Active,
    /// Processed and removed from the queue.
    Succeeded,
    /// Last processing attempt failed; the item stays queued.
    Error,
    /// Removed without being processed.
    Dropped,
}

impl ItemState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemState::Queued => "QUEUED",
            ItemState::Active => "ACTIVE",
            ItemState::Succeeded => "SUCCEEDED",
            ItemState::Error => "ERROR",
            ItemState::Dropped => "DROPPED",
        }
    }
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ItemState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "queued" => Ok(ItemState::Queued),
            "active" => Ok(ItemState::Active),
            "succeeded" => Ok(ItemState::Succeeded),
            "error" => Ok(ItemState::Error),
            "dropped" => Ok(ItemState::Dropped),
            _ => Err(Error::InvalidItemState(s.to_string())),
        }
    }
}

/// Outcome of placing (or processing) an item on a queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueItemState {
    pub item_state: ItemState,
    pub successful: bool,
    /// Number of processing attempts made so far.
    pub attempts: u32,
    /// When the item entered its queue, if it ever did.
    pub entered: Option<DateTime<Utc>>,
}

impl QueueItemState {
    /// A freshly queued item.
    pub fn queued(entered: DateTime<Utc>) -> Self {
        QueueItemState {
            item_state: ItemState::Queued,
            successful: true,
            attempts: 0,
            entered: Some(entered),
        }
    }

    /// A placement that did not happen.
    pub fn error() -> Self {
        QueueItemState {
            item_state: ItemState::Error,
            successful: false,
            attempts: 0,
            entered: None,
        }
    }
}

/// Queueable projection of a [`ReplicationPackage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicationQueueItem {
    pub id: String,
    pub paths: Vec<String>,
    pub action: Action,
    pub package_type: String,
    #[serde(default)]
    pub info: PackageInfo,
}

impl ReplicationQueueItem {
    /// Builds the queue item for a package.
    pub fn from_package(package: &dyn ReplicationPackage) -> Self {
        ReplicationQueueItem {
            id: package.id().to_string(),
            paths: package.paths().to_vec(),
            action: package.action(),
            package_type: package.package_type().to_string(),
            info: package.info().clone(),
        }
    }
}

/// An ordered, named holding area for one agent's pending items.
pub trait ReplicationQueue: Send + Sync {
    fn name(&self) -> &str;

    /// Appends an item. Returns `false` when the queue refused it.
    fn add(&self, item: ReplicationQueueItem) -> Result<bool>;

    /// State of the item with the given id, if the queue knows it.
    fn status(&self, item_id: &str) -> Option<QueueItemState>;

    /// The next item to process, without removing it.
    fn head(&self) -> Option<ReplicationQueueItem>;

    /// Removes an item by id, returning it if it was queued.
    fn remove(&self, item_id: &str) -> Option<ReplicationQueueItem>;

    /// Snapshot of queued items in processing order.
    fn items(&self) -> Vec<ReplicationQueueItem>;

    fn is_empty(&self) -> bool {
        self.head().is_none()
    }
}

/// Callback a provider invokes to process queued items.
pub trait QueueProcessor: Send + Sync {
    /// Processes one item. Returns `true` when the item can be removed.
    fn process(&self, queue_name: &str, item: &ReplicationQueueItem) -> bool;
}

/// Creates and looks up queues, and drives their processing.
pub trait QueueProvider: Send + Sync {
    fn queue(&self, agent_name: &str, queue_name: &str) -> Result<Arc<dyn ReplicationQueue>>;

    fn default_queue(&self, agent_name: &str) -> Result<Arc<dyn ReplicationQueue>> {
        self.queue(agent_name, DEFAULT_QUEUE_NAME)
    }

    /// Starts invoking `processor` for the agent's queues.
    fn enable_queue_processing(
        &self,
        agent_name: &str,
        processor: Arc<dyn QueueProcessor>,
    ) -> Result<()>;

    fn disable_queue_processing(&self, agent_name: &str) -> Result<()>;
}

/// Policy deciding onto which queue(s) a new item is placed.
pub trait DistributionStrategy: Send + Sync {
    /// Places the item. `Ok(None)` means the strategy produced no outcome.
    fn add(
        &self,
        agent_name: &str,
        item: &ReplicationQueueItem,
        provider: &dyn QueueProvider,
    ) -> Result<Option<QueueItemState>>;
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
