// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! File-backed collaborators.
//!
//! `FilePackageStore` keeps one JSON document per exported package so
//! packages survive a daemon restart. `JournalImporter` plays the
//! destination by appending every import to a JSON Lines journal.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rpl_core::{
    Action, Error, ExecutionContext, PackageExporter, PackageImporter, PackageInfo,
    ReplicationPackage, ReplicationRequest, Result,
};
use serde::{Deserialize, Serialize};

use crate::record::{unique_package_id, PackageRecord, PackageRemover, StoredPackage};

const PACKAGE_TYPE: &str = "file";

fn validate_id(id: &str) -> Result<()> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!("invalid package id: '{}'", id)))
    }
}

struct PackageDir {
    dir: PathBuf,
}

impl PackageDir {
    fn path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    fn write(&self, record: &PackageRecord) -> Result<()> {
        let target = self.path(&record.id);
        let tmp = self.dir.join(format!(".{}.json.tmp", record.id));
        let mut file = File::create(&tmp)?;
        serde_json::to_writer_pretty(&mut file, record)?;
        file.sync_all()?;
        fs::rename(&tmp, &target)?;
        Ok(())
    }

    fn read(&self, id: &str) -> Result<Option<PackageRecord>> {
        let content = match fs::read_to_string(self.path(id)) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| Error::PackageReading(format!("{}: {}", id, e)))
    }
}

impl PackageRemover for PackageDir {
    fn remove(&self, id: &str) -> Result<()> {
        match fs::remove_file(self.path(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Exporter persisting each package as `<dir>/<id>.json`.
pub struct FilePackageStore {
    inner: Arc<PackageDir>,
    seq: AtomicU64,
    // Held from the id check until the package file is in place.
    writing: Mutex<()>,
}

impl FilePackageStore {
    /// Opens a store in `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(FilePackageStore {
            inner: Arc::new(PackageDir { dir }),
            seq: AtomicU64::new(0),
            writing: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.inner.dir
    }

    /// Ids of the packages on disk, sorted.
    pub fn package_ids(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.inner.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    if !stem.starts_with('.') {
                        ids.push(stem.to_string());
                    }
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Writes `record`, renaming it first if a package file with its id
    /// already exists.
    pub(crate) fn write_unique(&self, mut record: PackageRecord) -> Result<PackageRecord> {
        let _guard = self.writing.lock().unwrap_or_else(|e| e.into_inner());
        record.id = unique_package_id(&record.id, |id| self.inner.path(id).exists());
        self.inner
            .write(&record)
            .map_err(|e| Error::PackageBuilding(format!("{}: {}", record.id, e)))?;
        Ok(record)
    }

    fn package(&self, record: PackageRecord) -> Box<dyn ReplicationPackage> {
        let remover: Arc<dyn PackageRemover> = self.inner.clone();
        Box::new(StoredPackage::new(record, remover))
    }
}

impl PackageExporter for FilePackageStore {
    fn export_packages(
        &self,
        _ctx: &ExecutionContext,
        request: &ReplicationRequest,
    ) -> Result<Vec<Box<dyn ReplicationPackage>>> {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let record = self.write_unique(PackageRecord::for_request(
            request,
            request.paths().to_vec(),
            PACKAGE_TYPE,
            seq,
        ))?;
        tracing::debug!(
            "wrote package {} to {}",
            record.id,
            self.inner.path(&record.id).display()
        );
        Ok(vec![self.package(record)])
    }

    fn export_package_by_id(
        &self,
        _ctx: &ExecutionContext,
        id: &str,
    ) -> Result<Option<Box<dyn ReplicationPackage>>> {
        validate_id(id)?;
        Ok(self.inner.read(id)?.map(|record| self.package(record)))
    }
}

/// One imported package as recorded in the journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub action: Action,
    pub paths: Vec<String>,
    #[serde(default)]
    pub info: PackageInfo,
    pub principal: String,
    pub imported_at: DateTime<Utc>,
}

/// Importer appending every package to a JSON Lines journal.
pub struct JournalImporter {
    path: PathBuf,
    write: Mutex<()>,
}

impl JournalImporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JournalImporter {
            path: path.into(),
            write: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> Result<Vec<JournalEntry>> {
        read_journal(&self.path)
    }
}

impl PackageImporter for JournalImporter {
    fn import_package(&self, ctx: &ExecutionContext, package: &dyn ReplicationPackage) -> Result<()> {
        let entry = JournalEntry {
            id: package.id().to_string(),
            action: package.action(),
            paths: package.paths().to_vec(),
            info: package.info().clone(),
            principal: ctx.principal().to_string(),
            imported_at: Utc::now(),
        };
        let line = serde_json::to_string(&entry)?;

        let _guard = self.write.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| Error::PackageImport(format!("{}: {}", self.path.display(), e)))?;
        writeln!(file, "{line}")?;
        file.sync_all()?;
        Ok(())
    }
}

/// Reads a journal, skipping blank lines. A missing journal is empty.
pub fn read_journal(path: &Path) -> Result<Vec<JournalEntry>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut entries = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        entries.push(serde_json::from_str(&line)?);
    }
    Ok(entries)
}

#[cfg(test)]
#[path = "fs_tests.rs"]
mod tests;
