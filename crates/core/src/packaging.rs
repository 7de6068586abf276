// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Package export/import and request authorization contracts.

use crate::context::ExecutionContext;
use crate::error::Result;
use crate::package::ReplicationPackage;
use crate::request::ReplicationRequest;

/// Turns requests into packages and looks packages up again by id.
pub trait PackageExporter: Send + Sync {
    /// Builds the packages for a request, in the order they should be
    /// scheduled. May return no package at all.
    fn export_packages(
        &self,
        ctx: &ExecutionContext,
        request: &ReplicationRequest,
    ) -> Result<Vec<Box<dyn ReplicationPackage>>>;

    /// Retrieves a previously exported package. `Ok(None)` when it is gone.
    fn export_package_by_id(
        &self,
        ctx: &ExecutionContext,
        id: &str,
    ) -> Result<Option<Box<dyn ReplicationPackage>>>;
}

/// Applies packages at the destination.
pub trait PackageImporter: Send + Sync {
    fn import_package(&self, ctx: &ExecutionContext, package: &dyn ReplicationPackage)
        -> Result<()>;
}

/// Approves or rejects requests before any package is built.
pub trait AuthorizationStrategy: Send + Sync {
    /// Fails with [`Error::NotAuthorized`](crate::Error::NotAuthorized) when
    /// the context may not run the request.
    fn check_permission(&self, ctx: &ExecutionContext, request: &ReplicationRequest)
        -> Result<()>;
}
