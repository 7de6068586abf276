// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory collaborators.
//!
//! Every collaborator an agent needs has an implementation here that keeps
//! its state in process. They back the daemon's `memory` store and let the
//! orchestrator be exercised in isolation. Most of them can be told to fail
//! so error paths can be driven deliberately.

mod context;
mod events;
mod importer;
mod queue;
mod store;

pub use context::MemoryContextFactory;
pub use events::{RecordedEvent, RecordingEventSink};
pub use importer::{ImportedPackage, MemoryImporter};
pub use queue::{
    DrainReport, MemoryQueue, MemoryQueueProvider, QueueWorker, FINISHED_STATES_RETAINED,
    INFO_QUEUE_ATTEMPTS, INFO_QUEUE_NAME,
};
pub use store::MemoryPackageStore;
