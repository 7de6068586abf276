// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use rpl_core::{
    Error, ExecutionContext, PackageExporter, ReplicationPackage, ReplicationRequest, Result,
};

use crate::record::{unique_package_id, PackageRecord, PackageRemover, StoredPackage};

const PACKAGE_TYPE: &str = "memory";

#[derive(Default)]
struct StoreInner {
    packages: Mutex<BTreeMap<String, PackageRecord>>,
}

impl PackageRemover for StoreInner {
    fn remove(&self, id: &str) -> Result<()> {
        self.packages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(id);
        Ok(())
    }
}

/// Exporter keeping packages in memory until they are deleted.
///
/// A request becomes one package, or one package per path when path
/// splitting is on.
#[derive(Default)]
pub struct MemoryPackageStore {
    inner: Arc<StoreInner>,
    seq: AtomicU64,
    split_paths: bool,
    failing: AtomicBool,
}

impl MemoryPackageStore {
    pub fn new() -> Self {
        MemoryPackageStore::default()
    }

    /// A store that exports one package per request path.
    pub fn with_split_paths() -> Self {
        MemoryPackageStore {
            split_paths: true,
            ..MemoryPackageStore::default()
        }
    }

    /// Makes every following export fail until reset.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock().contains_key(id)
    }

    /// Ids of all stored packages, sorted.
    pub fn package_ids(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, PackageRecord>> {
        self.inner.packages.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Stores `record`, renaming it first if its id is already taken.
    pub(crate) fn insert_unique(&self, mut record: PackageRecord) -> PackageRecord {
        let mut packages = self.lock();
        record.id = unique_package_id(&record.id, |id| packages.contains_key(id));
        packages.insert(record.id.clone(), record.clone());
        record
    }

    fn package(&self, record: PackageRecord) -> Box<dyn ReplicationPackage> {
        let remover: Arc<dyn PackageRemover> = self.inner.clone();
        Box::new(StoredPackage::new(record, remover))
    }
}

impl PackageExporter for MemoryPackageStore {
    fn export_packages(
        &self,
        _ctx: &ExecutionContext,
        request: &ReplicationRequest,
    ) -> Result<Vec<Box<dyn ReplicationPackage>>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::PackageBuilding(format!(
                "export of {} refused",
                request
            )));
        }

        let groups: Vec<Vec<String>> = if self.split_paths {
            request.paths().iter().map(|p| vec![p.clone()]).collect()
        } else {
            vec![request.paths().to_vec()]
        };

        let mut packages = Vec::with_capacity(groups.len());
        for paths in groups {
            let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
            let record =
                self.insert_unique(PackageRecord::for_request(request, paths, PACKAGE_TYPE, seq));
            packages.push(self.package(record));
        }
        Ok(packages)
    }

    fn export_package_by_id(
        &self,
        _ctx: &ExecutionContext,
        id: &str,
    ) -> Result<Option<Box<dyn ReplicationPackage>>> {
        let record = self.lock().get(id).cloned();
        Ok(record.map(|record| self.package(record)))
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
