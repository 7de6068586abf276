// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory queues and the provider that drains them.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::Utc;
use rpl_core::{
    Error, ItemState, QueueItemState, QueueProcessor, QueueProvider, ReplicationQueue,
    ReplicationQueueItem, Result,
};

/// Info key carrying the name of the queue an item is drained from.
pub const INFO_QUEUE_NAME: &str = "queue.name";

/// Info key carrying the number of failed attempts before the current one.
pub const INFO_QUEUE_ATTEMPTS: &str = "queue.attempts";

/// How many items that left a queue keep a reportable status.
pub const FINISHED_STATES_RETAINED: usize = 1024;

struct Entry {
    item: ReplicationQueueItem,
    state: QueueItemState,
}

#[derive(Default)]
struct QueueState {
    entries: VecDeque<Entry>,
    /// Last known state of items that left the queue.
    finished: BTreeMap<String, QueueItemState>,
    /// Ids in `finished`, oldest first.
    finished_order: VecDeque<String>,
}

impl QueueState {
    fn record_finished(&mut self, id: String, done: QueueItemState) {
        if self.finished.insert(id.clone(), done).is_some() {
            self.finished_order.retain(|finished| *finished != id);
        }
        self.finished_order.push_back(id);
        while self.finished_order.len() > FINISHED_STATES_RETAINED {
            if let Some(oldest) = self.finished_order.pop_front() {
                self.finished.remove(&oldest);
            }
        }
    }

    fn forget_finished(&mut self, id: &str) {
        if self.finished.remove(id).is_some() {
            self.finished_order.retain(|finished| finished != id);
        }
    }
}

/// A FIFO queue held in memory.
///
/// Items that fail processing stay at the head with their attempt count
/// raised, so later items wait behind them.
pub struct MemoryQueue {
    name: String,
    state: Mutex<QueueState>,
}

impl MemoryQueue {
    pub fn new(name: impl Into<String>) -> Self {
        MemoryQueue {
            name: name.into(),
            state: Mutex::new(QueueState::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn mark_active(&self, item_id: &str) -> Option<QueueItemState> {
        let mut state = self.lock();
        let entry = state.entries.iter_mut().find(|e| e.item.id == item_id)?;
        entry.state.item_state = ItemState::Active;
        Some(entry.state.clone())
    }

    fn complete(&self, item_id: &str) {
        let mut state = self.lock();
        if let Some(pos) = state.entries.iter().position(|e| e.item.id == item_id) {
            if let Some(entry) = state.entries.remove(pos) {
                let done = QueueItemState {
                    item_state: ItemState::Succeeded,
                    successful: true,
                    attempts: entry.state.attempts + 1,
                    entered: entry.state.entered,
                };
                state.record_finished(entry.item.id, done);
            }
        }
    }

    fn fail(&self, item_id: &str) {
        let mut state = self.lock();
        if let Some(entry) = state.entries.iter_mut().find(|e| e.item.id == item_id) {
            entry.state.attempts += 1;
            entry.state.item_state = ItemState::Error;
            entry.state.successful = false;
        }
    }
}

impl ReplicationQueue for MemoryQueue {
    fn name(&self) -> &str {
        &self.name
    }

    /// Refuses an item whose id is already queued.
    fn add(&self, item: ReplicationQueueItem) -> Result<bool> {
        let mut state = self.lock();
        if state.entries.iter().any(|e| e.item.id == item.id) {
            return Ok(false);
        }
        state.forget_finished(&item.id);
        state.entries.push_back(Entry {
            item,
            state: QueueItemState::queued(Utc::now()),
        });
        Ok(true)
    }

    fn status(&self, item_id: &str) -> Option<QueueItemState> {
        let state = self.lock();
        state
            .entries
            .iter()
            .find(|e| e.item.id == item_id)
            .map(|e| e.state.clone())
            .or_else(|| state.finished.get(item_id).cloned())
    }

    fn head(&self) -> Option<ReplicationQueueItem> {
        self.lock().entries.front().map(|e| e.item.clone())
    }

    fn remove(&self, item_id: &str) -> Option<ReplicationQueueItem> {
        let mut state = self.lock();
        let pos = state.entries.iter().position(|e| e.item.id == item_id)?;
        let entry = state.entries.remove(pos)?;
        let dropped = QueueItemState {
            item_state: ItemState::Dropped,
            successful: false,
            ..entry.state
        };
        state.record_finished(entry.item.id.clone(), dropped);
        Some(entry.item)
    }

    fn items(&self) -> Vec<ReplicationQueueItem> {
        self.lock().entries.iter().map(|e| e.item.clone()).collect()
    }
}

/// Outcome of a drain pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Items processed and removed.
    pub processed: usize,
    /// Items whose processing failed and which stayed queued.
    pub failed: usize,
}

impl DrainReport {
    fn merge(&mut self, other: DrainReport) {
        self.processed += other.processed;
        self.failed += other.failed;
    }
}

type QueueKey = (String, String);

/// Hands out [`MemoryQueue`]s per agent and drains them.
///
/// Draining happens when [`drain`](Self::drain) is called or, in the
/// background, through a [`QueueWorker`].
#[derive(Default)]
pub struct MemoryQueueProvider {
    queues: Mutex<BTreeMap<QueueKey, Arc<MemoryQueue>>>,
    processors: Mutex<BTreeMap<String, Arc<dyn QueueProcessor>>>,
    // One drain pass at a time, so a queue head is never processed twice.
    draining: Mutex<()>,
}

impl MemoryQueueProvider {
    pub fn new() -> Self {
        MemoryQueueProvider::default()
    }

    /// Whether a processor is registered for the agent.
    pub fn is_processing(&self, agent_name: &str) -> bool {
        self.processors
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(agent_name)
    }

    /// The agent's queues that exist so far, ordered by name.
    pub fn agent_queues(&self, agent_name: &str) -> Vec<Arc<MemoryQueue>> {
        self.queues
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|((agent, _), _)| agent == agent_name)
            .map(|(_, queue)| Arc::clone(queue))
            .collect()
    }

    /// Runs the agent's processor over each of its queues.
    ///
    /// A queue is drained from the head until it is empty or an item fails.
    /// Without a registered processor nothing happens.
    pub fn drain(&self, agent_name: &str) -> DrainReport {
        let _guard = self.draining.lock().unwrap_or_else(|e| e.into_inner());
        self.drain_agent(agent_name)
    }

    /// Drains every agent with a registered processor.
    pub fn drain_all(&self) -> DrainReport {
        let _guard = self.draining.lock().unwrap_or_else(|e| e.into_inner());
        let agents: Vec<String> = self
            .processors
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();

        let mut report = DrainReport::default();
        for agent in agents {
            report.merge(self.drain_agent(&agent));
        }
        report
    }

    /// Starts a thread draining all agents every `interval`.
    pub fn spawn_worker(self: &Arc<Self>, interval: Duration) -> Result<QueueWorker> {
        let provider = Arc::clone(self);
        let shutdown = Arc::new(AtomicBool::new(false));
        let stop = Arc::clone(&shutdown);

        let handle = thread::Builder::new()
            .name("rpl-queue-worker".to_string())
            .spawn(move || {
                while !stop.load(Ordering::SeqCst) {
                    let report = provider.drain_all();
                    if report.processed + report.failed > 0 {
                        tracing::debug!(
                            "queue worker processed {} item(s), {} failed",
                            report.processed,
                            report.failed
                        );
                    }
                    thread::park_timeout(interval);
                }
                tracing::debug!("queue worker stopped");
            })
            .map_err(|e| Error::Queue(format!("cannot start queue worker: {}", e)))?;

        tracing::info!("queue worker started (interval: {}ms)", interval.as_millis());
        Ok(QueueWorker {
            shutdown,
            handle: Some(handle),
        })
    }

    fn drain_agent(&self, agent_name: &str) -> DrainReport {
        let processor = self
            .processors
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(agent_name)
            .cloned();
        let Some(processor) = processor else {
            return DrainReport::default();
        };

        let mut report = DrainReport::default();
        for queue in self.agent_queues(agent_name) {
            while let Some(mut item) = queue.head() {
                let Some(state) = queue.mark_active(&item.id) else {
                    break;
                };
                item.info.insert(INFO_QUEUE_NAME, queue.name());
                item.info.insert(INFO_QUEUE_ATTEMPTS, state.attempts.to_string());

                if processor.process(queue.name(), &item) {
                    queue.complete(&item.id);
                    report.processed += 1;
                } else {
                    tracing::warn!(
                        "processing of {} failed on queue {}, will retry",
                        item.id,
                        queue.name()
                    );
                    queue.fail(&item.id);
                    report.failed += 1;
                    break;
                }
            }
        }
        report
    }
}

impl QueueProvider for MemoryQueueProvider {
    fn queue(&self, agent_name: &str, queue_name: &str) -> Result<Arc<dyn ReplicationQueue>> {
        if queue_name.trim().is_empty() {
            return Err(Error::Queue("queue name must not be empty".to_string()));
        }

        let mut queues = self.queues.lock().unwrap_or_else(|e| e.into_inner());
        let queue = queues
            .entry((agent_name.to_string(), queue_name.to_string()))
            .or_insert_with(|| {
                tracing::debug!("creating queue {} for agent {}", queue_name, agent_name);
                Arc::new(MemoryQueue::new(queue_name))
            });
        Ok(Arc::clone(queue) as Arc<dyn ReplicationQueue>)
    }

    fn enable_queue_processing(
        &self,
        agent_name: &str,
        processor: Arc<dyn QueueProcessor>,
    ) -> Result<()> {
        self.processors
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(agent_name.to_string(), processor);
        Ok(())
    }

    fn disable_queue_processing(&self, agent_name: &str) -> Result<()> {
        self.processors
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(agent_name);
        Ok(())
    }
}

/// Handle to a background drain thread. Dropping it stops the thread.
pub struct QueueWorker {
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl QueueWorker {
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stops the thread and waits for its current pass to finish.
    pub fn stop(mut self) {
        self.shutdown_and_join();
    }

    fn shutdown_and_join(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            if handle.join().is_err() {
                tracing::warn!("queue worker thread panicked");
            }
        }
    }
}

impl Drop for QueueWorker {
    fn drop(&mut self) {
        self.shutdown_and_join();
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
