// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Replication events emitted by agents.
//!
//! Events are best-effort notifications. A sink may fail, but the agent
//! never lets an emission failure affect the data path.

use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::Result;

/// Property key holding the comma-separated package paths.
pub const PROP_PACKAGE_PATHS: &str = "replication.package.paths";
/// Property key holding the emitting agent's name.
pub const PROP_AGENT_NAME: &str = "replication.agent.name";

/// Kinds of events an agent emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A package was placed on a queue.
    PackageQueued,
    /// A package was imported at its destination.
    PackageReplicated,
}

impl EventType {
    /// Returns the event topic.
    pub fn topic(&self) -> &'static str {
        match self {
            EventType::PackageQueued => "replication/package/queued",
            EventType::PackageReplicated => "replication/package/replicated",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.topic())
    }
}

/// String properties attached to an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventProperties(BTreeMap<String, String>);

impl EventProperties {
    pub fn new() -> Self {
        EventProperties::default()
    }

    /// Properties describing a package handled by an agent.
    pub fn for_package(agent_name: &str, paths: &[String]) -> Self {
        let mut props = EventProperties::new();
        props.insert(PROP_PACKAGE_PATHS, paths.join(","));
        props.insert(PROP_AGENT_NAME, agent_name);
        props
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }
}

/// Receives events emitted by agents.
pub trait EventSink: Send + Sync {
    fn generate_event(&self, event_type: EventType, properties: EventProperties) -> Result<()>;
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
