// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Authorization strategies.

use rpl_core::{Action, AuthorizationStrategy, Error, ExecutionContext, ReplicationRequest, Result};
use serde::{Deserialize, Serialize};

/// Permits every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AuthorizationStrategy for AllowAll {
    fn check_permission(&self, _ctx: &ExecutionContext, _request: &ReplicationRequest) -> Result<()> {
        Ok(())
    }
}

/// Grants `principal` the right to replicate everything under `prefix`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRule {
    pub principal: String,
    pub prefix: String,
}

impl AccessRule {
    pub fn new(principal: impl Into<String>, prefix: impl Into<String>) -> Self {
        AccessRule {
            principal: principal.into(),
            prefix: prefix.into(),
        }
    }

    /// Whether the rule covers `path` for `principal`.
    ///
    /// A prefix covers itself and its descendants, not siblings sharing a
    /// name prefix: `/content/a` covers `/content/a/b` but not `/content/ab`.
    pub fn covers(&self, principal: &str, path: &str) -> bool {
        self.principal == principal && is_under(&self.prefix, path)
    }
}

/// Whether `path` is `prefix` itself or one of its descendants.
pub(crate) fn is_under(prefix: &str, path: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    prefix.is_empty()
        || path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Checks request paths against per-principal path prefixes.
///
/// Adding and deleting need every path covered by a rule for the context's
/// principal. Polling moves nothing into the content tree and is always
/// permitted.
#[derive(Debug, Clone, Default)]
pub struct PathPrefixAuthorization {
    rules: Vec<AccessRule>,
}

impl PathPrefixAuthorization {
    pub fn new(rules: Vec<AccessRule>) -> Self {
        PathPrefixAuthorization { rules }
    }

    pub fn rules(&self) -> &[AccessRule] {
        &self.rules
    }
}

impl AuthorizationStrategy for PathPrefixAuthorization {
    fn check_permission(&self, ctx: &ExecutionContext, request: &ReplicationRequest) -> Result<()> {
        if request.action() == Action::Poll {
            return Ok(());
        }

        let principal = ctx.principal();
        for path in request.paths() {
            if !self.rules.iter().any(|rule| rule.covers(principal, path)) {
                return Err(Error::NotAuthorized(format!(
                    "{} may not {} {}",
                    principal,
                    request.action(),
                    path
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
