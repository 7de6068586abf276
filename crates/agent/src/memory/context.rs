// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use rpl_core::{ContextFactory, Error, ExecutionContext, Result};

/// Context factory acting as whatever service is asked for.
///
/// Tracks how many contexts are currently open so leaks show up.
#[derive(Default)]
pub struct MemoryContextFactory {
    open: Arc<AtomicUsize>,
    opened: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryContextFactory {
    pub fn new() -> Self {
        MemoryContextFactory::default()
    }

    /// Makes every following login fail until reset.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Contexts handed out and not yet released.
    pub fn open_contexts(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    /// Contexts handed out since creation.
    pub fn opened_contexts(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

impl ContextFactory for MemoryContextFactory {
    fn service_context(&self, service_name: &str) -> Result<ExecutionContext> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Login {
                service: service_name.to_string(),
                reason: "login disabled".to_string(),
            });
        }

        self.opened.fetch_add(1, Ordering::SeqCst);
        self.open.fetch_add(1, Ordering::SeqCst);
        let open = Arc::clone(&self.open);
        Ok(ExecutionContext::with_release(service_name, move |_| {
            open.fetch_sub(1, Ordering::SeqCst);
        }))
    }
}
