// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Triggers: external event sources that produce replication requests.

use std::sync::Arc;

use crate::error::Result;
use crate::request::ReplicationRequest;

/// Receives requests fired by a trigger.
///
/// Handlers run on the trigger's dispatch thread and must not panic or block
/// it on failure.
pub trait TriggerRequestHandler: Send + Sync {
    fn handle(&self, request: ReplicationRequest);
}

/// An event source that invokes registered handlers when it fires.
pub trait Trigger: Send + Sync {
    /// Registers `handler` under `handler_id`. Registering an id that is
    /// already present replaces the previous handler.
    fn register(&self, handler_id: &str, handler: Arc<dyn TriggerRequestHandler>) -> Result<()>;

    /// Removes the handler registered under `handler_id`, if any.
    fn unregister(&self, handler_id: &str) -> Result<()>;
}
