// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Agents built from configuration, and the collaborators they share.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rpl_agent::memory::{
    MemoryContextFactory, MemoryImporter, MemoryPackageStore, MemoryQueueProvider, QueueWorker,
};
use rpl_agent::{
    AgentBuilder, AllowAll, ErrorAwareStrategy, FilePackageStore, JournalImporter,
    PathPrefixAuthorization, PriorityPathStrategy, ScheduledTrigger, SimpleReplicationAgent,
    SingleQueueStrategy, TracingEventSink,
};
use rpl_core::{
    AuthorizationStrategy, DistributionStrategy, ExecutionContext, PackageExporter,
    PackageImporter, ReplicationQueueItem,
};
use rpl_ipc::AgentStatus;

use crate::config::{AgentConfig, Config, StoreKind, StrategyKind};
use crate::error::{DaemonError, Result};

/// Directory under the state directory holding per-agent files.
const AGENTS_DIR: &str = "agents";

/// Imports a memory-store agent remembers. The daemon never reads them back.
const RETAINED_IMPORTS: usize = 0;

struct Entry {
    agent: SimpleReplicationAgent,
    enable_on_start: bool,
}

/// The daemon's agents, in configuration order.
///
/// All agents share one queue provider and one context factory.
pub struct Registry {
    entries: Vec<Entry>,
    provider: Arc<MemoryQueueProvider>,
}

impl Registry {
    /// Builds every configured agent. Agents start disabled.
    pub fn build(config: &Config, state_dir: &Path) -> Result<Self> {
        let provider = Arc::new(MemoryQueueProvider::new());
        let contexts = Arc::new(MemoryContextFactory::new());
        let events = Arc::new(TracingEventSink);

        let mut entries = Vec::with_capacity(config.agents.len());
        for agent_config in &config.agents {
            let name = agent_config.name.trim();
            let agent_dir = state_dir.join(AGENTS_DIR).join(name);
            let collaborators = collaborators(agent_config, &agent_dir)?;

            let mut builder = AgentBuilder::new(name)
                .passive(agent_config.passive)
                .service_name(agent_config.service_name())
                .exporter(collaborators.exporter)
                .importer(collaborators.importer)
                .authorization(authorization(agent_config))
                .queue_provider(provider.clone())
                .strategy(strategy(agent_config))
                .events(events.clone())
                .contexts(contexts.clone());
            for trigger in &agent_config.triggers {
                builder = builder.trigger(Arc::new(ScheduledTrigger::new(
                    trigger.action,
                    trigger.path.clone(),
                    Duration::from_millis(trigger.interval_ms),
                )));
            }

            tracing::info!(
                "configured agent {} (store: {:?}, strategy: {:?}, passive: {})",
                name,
                agent_config.store,
                agent_config.strategy,
                agent_config.passive
            );
            let agent = builder.build()?;
            if let Some(store) = &collaborators.stored {
                requeue_stored(&agent, store)?;
            }
            entries.push(Entry {
                agent,
                enable_on_start: agent_config.enabled,
            });
        }

        Ok(Registry { entries, provider })
    }

    pub fn get(&self, name: &str) -> Option<&SimpleReplicationAgent> {
        self.entries
            .iter()
            .map(|e| &e.agent)
            .find(|agent| agent.name() == name)
    }

    pub fn agents(&self) -> impl Iterator<Item = &SimpleReplicationAgent> {
        self.entries.iter().map(|e| &e.agent)
    }

    pub fn provider(&self) -> &Arc<MemoryQueueProvider> {
        &self.provider
    }

    /// Enables the agents configured to start enabled.
    ///
    /// An agent that fails to enable is logged and left disabled; the others
    /// still start. Returns how many agents were enabled.
    pub fn enable_configured(&self) -> usize {
        let mut enabled = 0;
        for entry in self.entries.iter().filter(|e| e.enable_on_start) {
            match entry.agent.enable() {
                Ok(()) => enabled += 1,
                Err(e) => tracing::error!("{}", e),
            }
        }
        enabled
    }

    pub fn disable_all(&self) {
        for agent in self.agents() {
            agent.disable();
        }
    }

    /// Starts draining all active agents' queues in the background.
    pub fn start_worker(&self, interval: Duration) -> Result<QueueWorker> {
        self.provider
            .spawn_worker(interval)
            .map_err(DaemonError::Worker)
    }

    pub fn status(&self) -> Vec<AgentStatus> {
        self.agents()
            .map(|agent| AgentStatus {
                name: agent.name().to_string(),
                enabled: agent.is_enabled(),
                passive: agent.is_passive(),
                queued: agent.queue(None).map_or(0, |q| q.items().len()),
            })
            .collect()
    }
}

struct Collaborators {
    exporter: Arc<dyn PackageExporter>,
    importer: Arc<dyn PackageImporter>,
    /// Set when packages persist across restarts.
    stored: Option<Arc<FilePackageStore>>,
}

fn collaborators(config: &AgentConfig, agent_dir: &Path) -> Result<Collaborators> {
    match config.store {
        StoreKind::Memory => {
            let store = if config.split_paths {
                MemoryPackageStore::with_split_paths()
            } else {
                MemoryPackageStore::new()
            };
            Ok(Collaborators {
                exporter: Arc::new(store),
                importer: Arc::new(MemoryImporter::with_limit(RETAINED_IMPORTS)),
                stored: None,
            })
        }
        StoreKind::File => {
            let store = FilePackageStore::open(agent_dir.join("packages")).map_err(|source| {
                DaemonError::Collaborator {
                    agent: config.name.clone(),
                    source,
                }
            })?;
            let store = Arc::new(store);
            let exporter: Arc<dyn PackageExporter> = store.clone();
            Ok(Collaborators {
                exporter,
                importer: Arc::new(JournalImporter::new(agent_dir.join("journal.jsonl"))),
                stored: Some(store),
            })
        }
    }
}

/// Puts packages left in `store` by an earlier run back on the agent's
/// queues. A package that cannot be read is logged and left on disk.
fn requeue_stored(agent: &SimpleReplicationAgent, store: &FilePackageStore) -> Result<usize> {
    let ids = store.package_ids().map_err(|source| DaemonError::Collaborator {
        agent: agent.name().to_string(),
        source,
    })?;
    let ctx = ExecutionContext::new(agent.service_name());

    let mut requeued = 0;
    for id in ids {
        match store.export_package_by_id(&ctx, &id) {
            Ok(Some(package)) => {
                let response = agent.schedule(ReplicationQueueItem::from_package(package.as_ref()));
                if response.successful {
                    requeued += 1;
                } else {
                    tracing::warn!(
                        "could not re-queue package {} for agent {}",
                        id,
                        agent.name()
                    );
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("skipping stored package {}: {}", id, e),
        }
    }
    if requeued > 0 {
        tracing::info!(
            "re-queued {} stored package(s) for agent {}",
            requeued,
            agent.name()
        );
    }
    Ok(requeued)
}

fn authorization(config: &AgentConfig) -> Arc<dyn AuthorizationStrategy> {
    if config.rules.is_empty() {
        Arc::new(AllowAll)
    } else {
        Arc::new(PathPrefixAuthorization::new(config.rules.clone()))
    }
}

fn strategy(config: &AgentConfig) -> Arc<dyn DistributionStrategy> {
    match config.strategy {
        StrategyKind::Single => Arc::new(SingleQueueStrategy),
        StrategyKind::Priority => {
            Arc::new(PriorityPathStrategy::new(config.priority_paths.clone()))
        }
        StrategyKind::ErrorAware => Arc::new(ErrorAwareStrategy::new(
            config.attempts_threshold,
            config.stuck_queue,
        )),
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
