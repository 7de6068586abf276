// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use rpl_core::{
    AuthorizationStrategy, ContextFactory, DistributionStrategy, EventSink, PackageExporter,
    PackageImporter, QueueProvider, Trigger,
};

use crate::agent::{AgentCore, SimpleReplicationAgent};
use crate::error::AgentError;

/// Builder for [`SimpleReplicationAgent`].
///
/// Every collaborator except triggers is required. The service name used for
/// the agent's own contexts defaults to the agent name.
#[derive(Default)]
pub struct AgentBuilder {
    name: String,
    passive: bool,
    service_name: Option<String>,
    exporter: Option<Arc<dyn PackageExporter>>,
    importer: Option<Arc<dyn PackageImporter>>,
    authorization: Option<Arc<dyn AuthorizationStrategy>>,
    queue_provider: Option<Arc<dyn QueueProvider>>,
    strategy: Option<Arc<dyn DistributionStrategy>>,
    events: Option<Arc<dyn EventSink>>,
    contexts: Option<Arc<dyn ContextFactory>>,
    triggers: Vec<Arc<dyn Trigger>>,
}

impl AgentBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        AgentBuilder {
            name: name.into(),
            ..AgentBuilder::default()
        }
    }

    #[must_use]
    pub fn passive(mut self, passive: bool) -> Self {
        self.passive = passive;
        self
    }

    #[must_use]
    pub fn service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = Some(service_name.into());
        self
    }

    #[must_use]
    pub fn exporter(mut self, exporter: Arc<dyn PackageExporter>) -> Self {
        self.exporter = Some(exporter);
        self
    }

    #[must_use]
    pub fn importer(mut self, importer: Arc<dyn PackageImporter>) -> Self {
        self.importer = Some(importer);
        self
    }

    #[must_use]
    pub fn authorization(mut self, authorization: Arc<dyn AuthorizationStrategy>) -> Self {
        self.authorization = Some(authorization);
        self
    }

    #[must_use]
    pub fn queue_provider(mut self, queue_provider: Arc<dyn QueueProvider>) -> Self {
        self.queue_provider = Some(queue_provider);
        self
    }

    #[must_use]
    pub fn strategy(mut self, strategy: Arc<dyn DistributionStrategy>) -> Self {
        self.strategy = Some(strategy);
        self
    }

    #[must_use]
    pub fn events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = Some(events);
        self
    }

    #[must_use]
    pub fn contexts(mut self, contexts: Arc<dyn ContextFactory>) -> Self {
        self.contexts = Some(contexts);
        self
    }

    /// Adds a trigger. Handler ids follow the order triggers are added in.
    #[must_use]
    pub fn trigger(mut self, trigger: Arc<dyn Trigger>) -> Self {
        self.triggers.push(trigger);
        self
    }

    /// Builds the agent, disabled.
    pub fn build(self) -> Result<SimpleReplicationAgent, AgentError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AgentError::InvalidName(self.name));
        }
        let name = name.to_string();

        let core = AgentCore {
            service_name: self.service_name.unwrap_or_else(|| name.clone()),
            name,
            passive: self.passive,
            exporter: self.exporter.ok_or(AgentError::MissingComponent("exporter"))?,
            importer: self.importer.ok_or(AgentError::MissingComponent("importer"))?,
            authorization: self
                .authorization
                .ok_or(AgentError::MissingComponent("authorization strategy"))?,
            queue_provider: self
                .queue_provider
                .ok_or(AgentError::MissingComponent("queue provider"))?,
            strategy: self
                .strategy
                .ok_or(AgentError::MissingComponent("distribution strategy"))?,
            events: self.events.ok_or(AgentError::MissingComponent("event sink"))?,
            contexts: self
                .contexts
                .ok_or(AgentError::MissingComponent("context factory"))?,
            enabled: AtomicBool::new(false),
        };

        Ok(SimpleReplicationAgent::new(core, self.triggers))
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
