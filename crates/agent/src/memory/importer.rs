// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use rpl_core::{
    Action, Error, ExecutionContext, PackageImporter, PackageInfo, ReplicationPackage, Result,
};

/// A package as seen by the importer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedPackage {
    pub id: String,
    pub action: Action,
    pub paths: Vec<String>,
    pub info: PackageInfo,
    /// Principal of the context the import ran under.
    pub principal: String,
}

/// Importer that records what it imports.
///
/// Without a limit every import is kept.
#[derive(Default)]
pub struct MemoryImporter {
    imported: Mutex<VecDeque<ImportedPackage>>,
    limit: Option<usize>,
    failing: AtomicBool,
}

impl MemoryImporter {
    pub fn new() -> Self {
        MemoryImporter::default()
    }

    /// An importer remembering only its latest `limit` imports.
    pub fn with_limit(limit: usize) -> Self {
        MemoryImporter {
            limit: Some(limit),
            ..MemoryImporter::default()
        }
    }

    /// Makes every following import fail until reset.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Imports so far, in order.
    pub fn imported(&self) -> Vec<ImportedPackage> {
        self.imported
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }
}

impl PackageImporter for MemoryImporter {
    fn import_package(&self, ctx: &ExecutionContext, package: &dyn ReplicationPackage) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::PackageImport(format!(
                "destination refused package {}",
                package.id()
            )));
        }

        let mut imported = self.imported.lock().unwrap_or_else(|e| e.into_inner());
        imported.push_back(ImportedPackage {
            id: package.id().to_string(),
            action: package.action(),
            paths: package.paths().to_vec(),
            info: package.info().clone(),
            principal: ctx.principal().to_string(),
        });
        if let Some(limit) = self.limit {
            while imported.len() > limit {
                imported.pop_front();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "importer_tests.rs"]
mod tests;
