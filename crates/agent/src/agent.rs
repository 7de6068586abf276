// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The replication agent.
//!
//! An agent ties the collaborators together:
//! 1. `execute` authorizes a request, exports it into packages and schedules
//!    each package's queue item through the distribution strategy
//! 2. the queue provider later calls back into the agent to import each
//!    package at its destination and delete it from the export-side store
//! 3. `enable`/`disable` register and unregister the agent with its triggers
//!    and, for active agents, with the queue provider

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use rpl_core::{
    AuthorizationStrategy, ContextFactory, DistributionStrategy, EventProperties, EventSink,
    EventType, ExecutionContext, PackageExporter, PackageImporter, QueueProvider,
    ReplicationPackage, ReplicationQueue, ReplicationQueueItem, ReplicationRequest,
    ReplicationResponse, Trigger, TriggerRequestHandler, DEFAULT_QUEUE_NAME,
};

use crate::error::AgentError;
use crate::handler::{AgentQueueProcessor, AgentTriggerHandler};

/// Id under which an agent registers its handler with the trigger at `index`.
pub fn handler_id(agent_name: &str, index: usize) -> String {
    format!("{agent_name}-{index}")
}

/// State shared between the agent and the callbacks it hands out.
pub(crate) struct AgentCore {
    pub(crate) name: String,
    pub(crate) passive: bool,
    pub(crate) service_name: String,
    pub(crate) exporter: Arc<dyn PackageExporter>,
    pub(crate) importer: Arc<dyn PackageImporter>,
    pub(crate) authorization: Arc<dyn AuthorizationStrategy>,
    pub(crate) queue_provider: Arc<dyn QueueProvider>,
    pub(crate) strategy: Arc<dyn DistributionStrategy>,
    pub(crate) events: Arc<dyn EventSink>,
    pub(crate) contexts: Arc<dyn ContextFactory>,
    pub(crate) enabled: AtomicBool,
}

impl AgentCore {
    pub(crate) fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Opens a context acting as the agent itself.
    pub(crate) fn agent_context(&self) -> rpl_core::Result<ExecutionContext> {
        self.contexts.service_context(&self.service_name)
    }

    pub(crate) fn execute(
        &self,
        ctx: &ExecutionContext,
        request: &ReplicationRequest,
    ) -> Result<ReplicationResponse, AgentError> {
        self.try_execute(ctx, request).map_err(|source| {
            tracing::error!("error executing replication request {}: {}", request, source);
            AgentError::Execution {
                agent: self.name.clone(),
                source,
            }
        })
    }

    fn try_execute(
        &self,
        ctx: &ExecutionContext,
        request: &ReplicationRequest,
    ) -> rpl_core::Result<ReplicationResponse> {
        self.authorization.check_permission(ctx, request)?;
        let packages = self.build_packages(request)?;
        Ok(self.schedule_packages(packages))
    }

    fn build_packages(
        &self,
        request: &ReplicationRequest,
    ) -> rpl_core::Result<Vec<Box<dyn ReplicationPackage>>> {
        let agent_ctx = self.agent_context()?;
        self.exporter.export_packages(&agent_ctx, request)
    }

    /// Schedules every package in order.
    ///
    /// The returned response carries the outcome of the last package only.
    fn schedule_packages(&self, packages: Vec<Box<dyn ReplicationPackage>>) -> ReplicationResponse {
        let mut response = ReplicationResponse::default();
        for package in packages {
            let current = self.schedule(ReplicationQueueItem::from_package(package.as_ref()));
            response.successful = current.successful;
            response.status = current.status;
        }
        response
    }

    pub(crate) fn schedule(&self, item: ReplicationQueueItem) -> ReplicationResponse {
        tracing::info!("scheduling replication of package {}", item.id);

        match self
            .strategy
            .add(&self.name, &item, self.queue_provider.as_ref())
        {
            Ok(Some(state)) => {
                if state.successful {
                    self.emit(EventType::PackageQueued, &item.paths);
                }
                ReplicationResponse::from(&state)
            }
            Ok(None) => {
                tracing::warn!("no queue state returned for package {}", item.id);
                ReplicationResponse::error()
            }
            Err(e) => {
                tracing::error!("an error happened while queueing package {}: {}", item.id, e);
                ReplicationResponse::error()
            }
        }
    }

    /// Imports a queued package at the destination.
    ///
    /// Returns `true` only when the package was imported; it is then deleted
    /// from the export-side store. On any failure the package is kept so the
    /// queue can retry it.
    pub(crate) fn process_queue_item(&self, item: &ReplicationQueueItem) -> bool {
        tracing::debug!("reading package with id {}", item.id);

        let ctx = match self.agent_context() {
            Ok(ctx) => ctx,
            Err(e) => {
                tracing::error!(
                    "cannot obtain a context for service {}: {}",
                    self.service_name,
                    e
                );
                return false;
            }
        };

        let mut package = match self.exporter.export_package_by_id(&ctx, &item.id) {
            Ok(Some(package)) => package,
            Ok(None) => {
                tracing::warn!("replication package with id {} does not exist", item.id);
                return false;
            }
            Err(e) => {
                tracing::error!("could not read package {}: {}", item.id, e);
                return false;
            }
        };

        package.info_mut().fill_info(&item.info);

        if let Err(e) = self.importer.import_package(&ctx, package.as_ref()) {
            tracing::error!("could not import package {}: {}", item.id, e);
            return false;
        }

        self.emit(EventType::PackageReplicated, package.paths());

        if let Err(e) = package.delete() {
            tracing::warn!("package {} was imported but not deleted: {}", item.id, e);
        }
        true
    }

    fn emit(&self, event_type: EventType, paths: &[String]) {
        let properties = EventProperties::for_package(&self.name, paths);
        if let Err(e) = self.events.generate_event(event_type, properties) {
            tracing::warn!("failed to emit {} event: {}", event_type, e);
        }
    }
}

#[derive(Default)]
struct Lifecycle {
    enabled: bool,
    /// Trigger registrations made by `enable`, in registration order.
    registrations: Vec<(String, Arc<dyn Trigger>)>,
    processing: bool,
}

/// A replication agent built from pluggable collaborators.
///
/// Construct one with [`AgentBuilder`](crate::AgentBuilder). The agent starts
/// disabled; dropping it disables it.
pub struct SimpleReplicationAgent {
    core: Arc<AgentCore>,
    triggers: Vec<Arc<dyn Trigger>>,
    lifecycle: Mutex<Lifecycle>,
}

impl SimpleReplicationAgent {
    pub(crate) fn new(core: AgentCore, triggers: Vec<Arc<dyn Trigger>>) -> Self {
        SimpleReplicationAgent {
            core: Arc::new(core),
            triggers,
            lifecycle: Mutex::new(Lifecycle::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.core.name
    }

    /// Service the agent's own contexts act as.
    pub fn service_name(&self) -> &str {
        &self.core.service_name
    }

    /// A passive agent never drains its own queues.
    pub fn is_passive(&self) -> bool {
        self.core.passive
    }

    pub fn is_enabled(&self) -> bool {
        self.core.is_enabled()
    }

    /// Authorizes, exports and schedules a request.
    ///
    /// `ctx` is the caller's context and is only used for authorization;
    /// packages are built under the agent's own context.
    pub fn execute(
        &self,
        ctx: &ExecutionContext,
        request: &ReplicationRequest,
    ) -> Result<ReplicationResponse, AgentError> {
        self.core.execute(ctx, request)
    }

    /// Places a single item through the distribution strategy.
    pub fn schedule(&self, item: ReplicationQueueItem) -> ReplicationResponse {
        self.core.schedule(item)
    }

    /// Imports the package behind a queue item.
    ///
    /// This is the callback the queue provider drives for active agents;
    /// external pullers of a passive agent's queue may call it directly.
    pub fn process_queue_item(&self, item: &ReplicationQueueItem) -> bool {
        self.core.process_queue_item(item)
    }

    /// Returns the named queue, or the default queue when `queue_name` is
    /// absent or empty.
    pub fn queue(&self, queue_name: Option<&str>) -> Result<Arc<dyn ReplicationQueue>, AgentError> {
        let provider = &self.core.queue_provider;
        let (queue, result) = match queue_name.filter(|name| !name.is_empty()) {
            Some(name) => (name, provider.queue(&self.core.name, name)),
            None => (
                DEFAULT_QUEUE_NAME,
                provider.default_queue(&self.core.name),
            ),
        };
        result.map_err(|source| AgentError::Queue {
            agent: self.core.name.clone(),
            queue: queue.to_string(),
            source,
        })
    }

    /// Registers the agent with its triggers and, unless passive, with the
    /// queue provider.
    ///
    /// Enabling an enabled agent does nothing. If any registration fails the
    /// ones already made are undone and the agent stays disabled.
    pub fn enable(&self) -> Result<(), AgentError> {
        let mut lifecycle = self.lifecycle.lock().unwrap_or_else(|e| e.into_inner());
        if lifecycle.enabled {
            tracing::debug!("agent {} is already enabled", self.core.name);
            return Ok(());
        }

        tracing::info!("enabling agent {}", self.core.name);
        // Triggers may fire as soon as they are registered.
        self.core.enabled.store(true, Ordering::SeqCst);

        let handler: Arc<dyn TriggerRequestHandler> =
            Arc::new(AgentTriggerHandler::new(Arc::clone(&self.core)));
        for (index, trigger) in self.triggers.iter().enumerate() {
            let handler_id = handler_id(&self.core.name, index);
            if let Err(source) = trigger.register(&handler_id, Arc::clone(&handler)) {
                self.rollback(&mut lifecycle);
                return Err(AgentError::Trigger {
                    agent: self.core.name.clone(),
                    handler_id,
                    source,
                });
            }
            lifecycle
                .registrations
                .push((handler_id, Arc::clone(trigger)));
        }

        if !self.core.passive {
            let processor = Arc::new(AgentQueueProcessor::new(Arc::clone(&self.core)));
            if let Err(source) = self
                .core
                .queue_provider
                .enable_queue_processing(&self.core.name, processor)
            {
                self.rollback(&mut lifecycle);
                return Err(AgentError::QueueProcessing {
                    agent: self.core.name.clone(),
                    source,
                });
            }
            lifecycle.processing = true;
        }

        lifecycle.enabled = true;
        Ok(())
    }

    /// Reverses every registration made by [`enable`](Self::enable).
    ///
    /// Calls already past their enabled check run to completion.
    pub fn disable(&self) {
        let mut lifecycle = self.lifecycle.lock().unwrap_or_else(|e| e.into_inner());
        if !lifecycle.enabled {
            return;
        }

        tracing::info!("disabling agent {}", self.core.name);
        self.rollback(&mut lifecycle);
        lifecycle.enabled = false;
    }

    fn rollback(&self, lifecycle: &mut Lifecycle) {
        self.core.enabled.store(false, Ordering::SeqCst);

        for (handler_id, trigger) in lifecycle.registrations.drain(..) {
            if let Err(e) = trigger.unregister(&handler_id) {
                tracing::warn!("failed to unregister trigger handler {}: {}", handler_id, e);
            }
        }

        if lifecycle.processing {
            if let Err(e) = self
                .core
                .queue_provider
                .disable_queue_processing(&self.core.name)
            {
                tracing::warn!(
                    "failed to disable queue processing for agent {}: {}",
                    self.core.name,
                    e
                );
            }
            lifecycle.processing = false;
        }
    }
}

impl Drop for SimpleReplicationAgent {
    fn drop(&mut self) {
        self.disable();
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
