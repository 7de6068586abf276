// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! rpl-agent: Replication agent and reference collaborators
//!
//! This crate provides [`SimpleReplicationAgent`], which orchestrates the
//! collaborators defined in `rpl-core`, together with in-memory and
//! file-backed implementations of those collaborators used by the rpld
//! daemon.

pub mod agent;
pub mod auth;
pub mod builder;
pub mod error;
pub mod events;
pub mod fs;
mod handler;
pub mod memory;
pub mod record;
pub mod strategy;
pub mod trigger;

pub use agent::{handler_id, SimpleReplicationAgent};
pub use auth::{AccessRule, AllowAll, PathPrefixAuthorization};
pub use builder::AgentBuilder;
pub use error::AgentError;
pub use events::TracingEventSink;
pub use fs::{read_journal, FilePackageStore, JournalEntry, JournalImporter};
pub use strategy::{
    ErrorAwareStrategy, PriorityPathStrategy, SingleQueueStrategy, StuckQueueHandling,
    ERROR_QUEUE_NAME, PRIORITY_QUEUE_NAME,
};
pub use trigger::{ManualTrigger, ScheduledTrigger};
