// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! rpl-core: Shared model and collaborator contracts for rpl
//!
//! This crate defines the replication data model (requests, packages, queue
//! items, responses, events) and the traits every pluggable collaborator of
//! a replication agent implements.

pub mod context;
pub mod error;
pub mod event;
pub mod package;
pub mod packaging;
pub mod queue;
pub mod request;
pub mod response;
pub mod trigger;

pub use context::{ContextFactory, ExecutionContext};
pub use error::{Error, Result};
pub use event::{EventProperties, EventSink, EventType, PROP_AGENT_NAME, PROP_PACKAGE_PATHS};
pub use package::{PackageInfo, ReplicationPackage};
pub use packaging::{AuthorizationStrategy, PackageExporter, PackageImporter};
pub use queue::{
    DistributionStrategy, ItemState, QueueItemState, QueueProcessor, QueueProvider,
    ReplicationQueue, ReplicationQueueItem, DEFAULT_QUEUE_NAME,
};
pub use request::{Action, ReplicationRequest};
pub use response::ReplicationResponse;
pub use trigger::{Trigger, TriggerRequestHandler};
