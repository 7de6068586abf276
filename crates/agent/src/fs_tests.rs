// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use tempfile::TempDir;
use yare::parameterized;

fn ctx() -> ExecutionContext {
    ExecutionContext::new("replication-service")
}

fn export_one(store: &FilePackageStore, path: &str) -> String {
    let request = ReplicationRequest::new(Action::Add, [path]);
    store.export_packages(&ctx(), &request).unwrap()[0]
        .id()
        .to_string()
}

#[test]
fn export_writes_package_file() {
    let temp = TempDir::new().unwrap();
    let store = FilePackageStore::open(temp.path().join("packages")).unwrap();

    let id = export_one(&store, "/content/a");

    assert!(store.dir().join(format!("{id}.json")).exists());
    assert_eq!(store.package_ids().unwrap(), vec![id]);
}

#[test]
fn packages_survive_reopening_the_store() {
    let temp = TempDir::new().unwrap();
    let id = export_one(&FilePackageStore::open(temp.path()).unwrap(), "/content/a");

    let reopened = FilePackageStore::open(temp.path()).unwrap();
    let package = reopened.export_package_by_id(&ctx(), &id).unwrap().unwrap();

    assert_eq!(package.id(), id);
    assert_eq!(package.paths(), &["/content/a"]);
    assert_eq!(package.package_type(), "file");
    assert!(package.info().get(crate::record::INFO_EXPORTED_AT).is_some());
}

#[test]
fn colliding_ids_do_not_overwrite_package_files() {
    let temp = TempDir::new().unwrap();
    let store = FilePackageStore::open(temp.path()).unwrap();
    let request = ReplicationRequest::new(Action::Add, ["/content/a"]);
    let record = PackageRecord::for_request(&request, request.paths().to_vec(), "file", 1);
    let mut other = record.clone();
    other.paths = vec!["/content/b".to_string()];

    let first = store.write_unique(record.clone()).unwrap();
    let second = store.write_unique(other).unwrap();

    assert_eq!(first.id, record.id);
    assert_eq!(second.id, format!("{}-2", record.id));
    assert_eq!(store.package_ids().unwrap(), vec![first.id.clone(), second.id.clone()]);
    let kept = store.export_package_by_id(&ctx(), &first.id).unwrap().unwrap();
    assert_eq!(kept.paths(), &["/content/a"]);
}

#[test]
fn missing_package_is_none() {
    let temp = TempDir::new().unwrap();
    let store = FilePackageStore::open(temp.path()).unwrap();
    assert!(store.export_package_by_id(&ctx(), "pkg-00000000").unwrap().is_none());
}

#[parameterized(
    empty = { "" },
    traversal = { "../etc/passwd" },
    separator = { "a/b" },
)]
fn invalid_ids_are_rejected(id: &str) {
    let temp = TempDir::new().unwrap();
    let store = FilePackageStore::open(temp.path()).unwrap();
    let err = store.export_package_by_id(&ctx(), id).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn corrupt_package_file_is_a_read_error() {
    let temp = TempDir::new().unwrap();
    let store = FilePackageStore::open(temp.path()).unwrap();
    fs::write(temp.path().join("pkg-bad.json"), "not json").unwrap();

    let err = store.export_package_by_id(&ctx(), "pkg-bad").unwrap_err();

    assert!(matches!(err, Error::PackageReading(_)));
}

#[test]
fn delete_removes_package_file() {
    let temp = TempDir::new().unwrap();
    let store = FilePackageStore::open(temp.path()).unwrap();
    let id = export_one(&store, "/content/a");

    let package = store.export_package_by_id(&ctx(), &id).unwrap().unwrap();
    package.delete().unwrap();

    assert!(store.package_ids().unwrap().is_empty());
}

#[test]
fn journal_appends_imports_in_order() {
    let temp = TempDir::new().unwrap();
    let store = FilePackageStore::open(temp.path().join("packages")).unwrap();
    let importer = JournalImporter::new(temp.path().join("journal.jsonl"));
    let first = export_one(&store, "/content/a");
    let second = export_one(&store, "/content/b");

    for id in [&first, &second] {
        let package = store.export_package_by_id(&ctx(), id).unwrap().unwrap();
        importer.import_package(&ctx(), package.as_ref()).unwrap();
    }

    let entries = importer.entries().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, first);
    assert_eq!(entries[1].paths, vec!["/content/b"]);
    assert_eq!(entries[0].principal, "replication-service");
}

#[test]
fn missing_journal_reads_empty() {
    let temp = TempDir::new().unwrap();
    assert!(read_journal(&temp.path().join("none.jsonl")).unwrap().is_empty());
}

#[test]
fn journal_skips_blank_lines() {
    let temp = TempDir::new().unwrap();
    let importer = JournalImporter::new(temp.path().join("journal.jsonl"));
    let store = FilePackageStore::open(temp.path().join("packages")).unwrap();
    let id = export_one(&store, "/content/a");
    let package = store.export_package_by_id(&ctx(), &id).unwrap().unwrap();
    importer.import_package(&ctx(), package.as_ref()).unwrap();

    let mut file = OpenOptions::new().append(true).open(importer.path()).unwrap();
    writeln!(file).unwrap();

    assert_eq!(importer.entries().unwrap().len(), 1);
}
