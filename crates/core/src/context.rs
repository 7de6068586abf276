// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Execution contexts: scoped sessions against the content system.
//!
//! A context is released when it is dropped, so every exit path of the code
//! holding it gives the session back.

use std::fmt;

use crate::error::Result;

type ReleaseFn = Box<dyn FnOnce(&str) + Send>;

/// A scoped session acting on behalf of a principal.
pub struct ExecutionContext {
    principal: String,
    release: Option<ReleaseFn>,
}

impl ExecutionContext {
    /// Creates a context that needs no release.
    pub fn new(principal: impl Into<String>) -> Self {
        ExecutionContext {
            principal: principal.into(),
            release: None,
        }
    }

    /// Creates a context that calls `release` with its principal on drop.
    pub fn with_release<F>(principal: impl Into<String>, release: F) -> Self
    where
        F: FnOnce(&str) + Send + 'static,
    {
        ExecutionContext {
            principal: principal.into(),
            release: Some(Box::new(release)),
        }
    }

    /// The principal the context acts for.
    pub fn principal(&self) -> &str {
        &self.principal
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("principal", &self.principal)
            .finish_non_exhaustive()
    }
}

impl Drop for ExecutionContext {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release(&self.principal);
        }
    }
}

/// Opens contexts for service principals.
pub trait ContextFactory: Send + Sync {
    /// Opens a context acting as the given service.
    fn service_context(&self, service_name: &str) -> Result<ExecutionContext>;
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
