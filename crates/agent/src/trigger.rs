// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Triggers: sources of requests an agent reacts to once enabled.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rpl_core::{Action, Error, ReplicationRequest, Result, Trigger, TriggerRequestHandler};

type Handlers = BTreeMap<String, Arc<dyn TriggerRequestHandler>>;

/// Trigger fired explicitly by its owner.
#[derive(Default)]
pub struct ManualTrigger {
    handlers: Mutex<Handlers>,
}

impl ManualTrigger {
    pub fn new() -> Self {
        ManualTrigger::default()
    }

    /// Delivers `request` to every registered handler, returning how many
    /// received it.
    pub fn fire(&self, request: &ReplicationRequest) -> usize {
        let handlers: Vec<_> = self.lock().values().cloned().collect();
        for handler in &handlers {
            handler.handle(request.clone());
        }
        handlers.len()
    }

    /// Ids of registered handlers, sorted.
    pub fn handler_ids(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, Handlers> {
        self.handlers.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Trigger for ManualTrigger {
    fn register(&self, handler_id: &str, handler: Arc<dyn TriggerRequestHandler>) -> Result<()> {
        self.lock().insert(handler_id.to_string(), handler);
        Ok(())
    }

    fn unregister(&self, handler_id: &str) -> Result<()> {
        match self.lock().remove(handler_id) {
            Some(_) => Ok(()),
            None => Err(Error::Trigger(format!(
                "handler {} is not registered",
                handler_id
            ))),
        }
    }
}

struct Schedule {
    shutdown: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl Schedule {
    fn stop(self) {
        self.shutdown.store(true, Ordering::SeqCst);
        // A handler unregistering itself cannot wait for its own thread.
        if self.handle.thread().id() == thread::current().id() {
            return;
        }
        self.handle.thread().unpark();
        if self.handle.join().is_err() {
            tracing::warn!("scheduled trigger thread panicked");
        }
    }
}

/// Trigger firing `(action, [path])` at a fixed interval.
///
/// Each registered handler gets its own thread; the first request is fired
/// one interval after registration.
pub struct ScheduledTrigger {
    action: Action,
    path: String,
    interval: Duration,
    schedules: Mutex<BTreeMap<String, Schedule>>,
}

impl ScheduledTrigger {
    pub fn new(action: Action, path: impl Into<String>, interval: Duration) -> Self {
        ScheduledTrigger {
            action,
            path: path.into(),
            interval,
            schedules: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Ids of handlers with a running schedule, sorted.
    pub fn handler_ids(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Schedule>> {
        self.schedules.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn spawn(&self, handler_id: &str, handler: Arc<dyn TriggerRequestHandler>) -> Result<Schedule> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let stop = Arc::clone(&shutdown);
        let action = self.action;
        let path = self.path.clone();
        let interval = self.interval;

        let handle = thread::Builder::new()
            .name(format!("rpl-trigger-{}", handler_id))
            .spawn(move || {
                while wait(interval, &stop) {
                    handler.handle(ReplicationRequest::new(action, [path.as_str()]));
                }
            })
            .map_err(|e| Error::Trigger(format!("cannot start schedule: {}", e)))?;

        Ok(Schedule { shutdown, handle })
    }
}

/// Sleeps for `interval`, returning `false` as soon as `stop` is raised.
fn wait(interval: Duration, stop: &AtomicBool) -> bool {
    let deadline = Instant::now() + interval;
    loop {
        if stop.load(Ordering::SeqCst) {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::park_timeout(deadline - now);
    }
}

impl Trigger for ScheduledTrigger {
    fn register(&self, handler_id: &str, handler: Arc<dyn TriggerRequestHandler>) -> Result<()> {
        if self.interval.is_zero() {
            return Err(Error::Trigger("schedule interval must be positive".to_string()));
        }

        let schedule = self.spawn(handler_id, handler)?;
        let previous = self.lock().insert(handler_id.to_string(), schedule);
        if let Some(previous) = previous {
            tracing::debug!("replacing schedule of handler {}", handler_id);
            previous.stop();
        }
        tracing::debug!(
            "scheduled {} {} every {}ms for handler {}",
            self.action,
            self.path,
            self.interval.as_millis(),
            handler_id
        );
        Ok(())
    }

    fn unregister(&self, handler_id: &str) -> Result<()> {
        let schedule = self.lock().remove(handler_id);
        match schedule {
            Some(schedule) => {
                schedule.stop();
                Ok(())
            }
            None => Err(Error::Trigger(format!(
                "handler {} is not registered",
                handler_id
            ))),
        }
    }
}

impl Drop for ScheduledTrigger {
    fn drop(&mut self) {
        let schedules = std::mem::take(&mut *self.lock());
        for schedule in schedules.into_values() {
            schedule.stop();
        }
    }
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;
