// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Replication packages: the exported unit of work.
//!
//! A package is produced by a [`PackageExporter`](crate::PackageExporter),
//! travels through the queueing layer as a lightweight
//! [`ReplicationQueueItem`](crate::ReplicationQueueItem), and is deleted
//! from the export-side store once it has been imported at the destination.

use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::Result;
use crate::request::Action;

/// Key/value metadata carried with a package from export to import.
///
/// Keys are kept in sorted order so that rendering and serialization are
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageInfo(BTreeMap<String, String>);

impl PackageInfo {
    pub fn new() -> Self {
        PackageInfo::default()
    }

    /// Inserts a value, returning the previous one for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Merges `other` into this bag. Values from `other` win on conflicts.
    pub fn fill_info(&mut self, other: &PackageInfo) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PackageInfo {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        PackageInfo(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// An exported, addressable unit of replicated content change.
///
/// Implementations are owned by the store that exported them. Deleting a
/// package consumes it so it cannot be used afterwards.
pub trait ReplicationPackage: Send + fmt::Debug {
    /// Unique id; joins the package with its queue item.
    fn id(&self) -> &str;

    /// Serialization format tag.
    fn package_type(&self) -> &str;

    fn action(&self) -> Action;

    fn paths(&self) -> &[String];

    fn info(&self) -> &PackageInfo;

    fn info_mut(&mut self) -> &mut PackageInfo;

    /// Removes the package from the export-side store.
    fn delete(self: Box<Self>) -> Result<()>;
}

#[cfg(test)]
#[path = "package_tests.rs"]
mod tests;
