// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::TimeZone;
use std::sync::Mutex;

#[derive(Default)]
struct RecordingRemover {
    removed: Mutex<Vec<String>>,
}

impl PackageRemover for RecordingRemover {
    fn remove(&self, id: &str) -> Result<()> {
        self.removed.lock().unwrap().push(id.to_string());
        Ok(())
    }
}

#[test]
fn package_id_format() {
    let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let id = generate_package_id(Action::Add, &["/content/a".into()], &at, 1);
    assert!(id.starts_with("pkg-"));
    assert_eq!(id.len(), "pkg-".len() + 8);
    assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn package_id_depends_on_sequence() {
    let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let paths = vec!["/content/a".to_string()];
    let first = generate_package_id(Action::Add, &paths, &at, 1);
    let second = generate_package_id(Action::Add, &paths, &at, 2);
    assert_ne!(first, second);
    assert_eq!(first, generate_package_id(Action::Add, &paths, &at, 1));
}

#[test]
fn free_package_id_is_kept() {
    assert_eq!(unique_package_id("pkg-0a1b2c3d", |_| false), "pkg-0a1b2c3d");
}

#[test]
fn taken_package_id_gets_next_free_suffix() {
    let taken = ["pkg-0a1b2c3d", "pkg-0a1b2c3d-2"];
    let id = unique_package_id("pkg-0a1b2c3d", |id| taken.contains(&id));
    assert_eq!(id, "pkg-0a1b2c3d-3");
}

#[test]
fn record_for_request_stamps_export_time() {
    let request = ReplicationRequest::new(Action::Delete, ["/content/a"]);
    let record = PackageRecord::for_request(&request, request.paths().to_vec(), "memory", 7);

    assert_eq!(record.action, Action::Delete);
    assert_eq!(record.package_type, "memory");
    assert_eq!(record.paths, vec!["/content/a"]);
    assert!(record.info.get(INFO_EXPORTED_AT).is_some());
}

#[test]
fn stored_package_delete_uses_remover() {
    let request = ReplicationRequest::new(Action::Add, ["/content/a"]);
    let record = PackageRecord::for_request(&request, request.paths().to_vec(), "memory", 1);
    let id = record.id.clone();
    let remover = Arc::new(RecordingRemover::default());

    let package: Box<dyn ReplicationPackage> =
        Box::new(StoredPackage::new(record, remover.clone()));
    package.delete().unwrap();

    assert_eq!(*remover.removed.lock().unwrap(), vec![id]);
}
