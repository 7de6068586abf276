// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Package records shared by the reference package stores.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rpl_core::{Action, PackageInfo, ReplicationPackage, ReplicationRequest, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Info key recording when a package was exported.
pub const INFO_EXPORTED_AT: &str = "package.exported_at";

/// Generate a package ID from the request content and a sequence number.
/// Format: pkg-{hash} where hash is first 8 hex chars of SHA256(action + paths + timestamp + seq)
pub fn generate_package_id(
    action: Action,
    paths: &[String],
    created_at: &DateTime<Utc>,
    seq: u64,
) -> String {
    let input = format!(
        "{}{}{}{}",
        action,
        paths.join("\n"),
        created_at.to_rfc3339(),
        seq
    );
    let hash = Sha256::digest(input.as_bytes());
    format!("pkg-{}", hex::encode(&hash[..4]))
}

/// Returns `base_id` if `exists` says it is free, otherwise the first free
/// `{base_id}-{n}` counting from 2.
pub fn unique_package_id<F>(base_id: &str, exists: F) -> String
where
    F: Fn(&str) -> bool,
{
    if !exists(base_id) {
        return base_id.to_string();
    }

    let mut suffix = 2;
    loop {
        let candidate = format!("{}-{}", base_id, suffix);
        if !exists(&candidate) {
            tracing::debug!("package id {} taken, using {}", base_id, candidate);
            return candidate;
        }
        suffix += 1;
    }
}

/// Everything a store keeps about an exported package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    pub id: String,
    pub package_type: String,
    pub action: Action,
    pub paths: Vec<String>,
    #[serde(default)]
    pub info: PackageInfo,
    pub created_at: DateTime<Utc>,
}

impl PackageRecord {
    /// Builds the record for (part of) a request.
    pub fn for_request(
        request: &ReplicationRequest,
        paths: Vec<String>,
        package_type: &str,
        seq: u64,
    ) -> Self {
        let created_at = Utc::now();
        let id = generate_package_id(request.action(), &paths, &created_at, seq);
        let mut info = PackageInfo::new();
        info.insert(INFO_EXPORTED_AT, created_at.to_rfc3339());
        PackageRecord {
            id,
            package_type: package_type.to_string(),
            action: request.action(),
            paths,
            info,
            created_at,
        }
    }
}

/// Removes packages from the store that exported them.
pub(crate) trait PackageRemover: Send + Sync {
    fn remove(&self, id: &str) -> Result<()>;
}

/// A package handed out by a reference store.
pub(crate) struct StoredPackage {
    record: PackageRecord,
    remover: Arc<dyn PackageRemover>,
}

impl StoredPackage {
    pub(crate) fn new(record: PackageRecord, remover: Arc<dyn PackageRemover>) -> Self {
        StoredPackage { record, remover }
    }
}

impl fmt::Debug for StoredPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredPackage")
            .field("record", &self.record)
            .finish_non_exhaustive()
    }
}

impl ReplicationPackage for StoredPackage {
    fn id(&self) -> &str {
        &self.record.id
    }

    fn package_type(&self) -> &str {
        &self.record.package_type
    }

    fn action(&self) -> Action {
        self.record.action
    }

    fn paths(&self) -> &[String] {
        &self.record.paths
    }

    fn info(&self) -> &PackageInfo {
        &self.record.info
    }

    fn info_mut(&mut self) -> &mut PackageInfo {
        &mut self.record.info
    }

    fn delete(self: Box<Self>) -> Result<()> {
        self.remover.remove(&self.record.id)
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
