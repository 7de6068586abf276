// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use rpl_core::{Error, EventProperties, EventSink, EventType, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEvent {
    pub event_type: EventType,
    pub properties: EventProperties,
}

/// Event sink that keeps every event it receives.
///
/// When failing, events are still recorded before the error is returned, so
/// callers can check an emission was attempted.
#[derive(Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<RecordedEvent>>,
    failing: AtomicBool,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        RecordingEventSink::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of recorded events of one type.
    pub fn count(&self, event_type: EventType) -> usize {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|e| e.event_type == event_type)
            .count()
    }
}

impl EventSink for RecordingEventSink {
    fn generate_event(&self, event_type: EventType, properties: EventProperties) -> Result<()> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedEvent {
                event_type,
                properties,
            });
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Event(format!("sink rejected {}", event_type)));
        }
        Ok(())
    }
}
