// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use rpl_core::{EventProperties, EventSink, EventType, Result};

/// Event sink writing each event to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn generate_event(&self, event_type: EventType, properties: EventProperties) -> Result<()> {
        let rendered: Vec<String> = properties
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        tracing::info!("event {} [{}]", event_type, rendered.join(" "));
        Ok(())
    }
}
