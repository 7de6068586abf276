// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    not_authorized = { Error::NotAuthorized("/content/a".into()), "/content/a" },
    building = { Error::PackageBuilding("no paths".into()), "build package" },
    reading = { Error::PackageReading("gone".into()), "read package" },
    import = { Error::PackageImport("refused".into()), "import package" },
    invalid_action = { Error::InvalidAction("copy".into()), "copy" },
)]
fn error_display_contains(err: Error, expected: &str) {
    assert!(err.to_string().contains(expected));
}

#[test]
fn error_login_display_names_service() {
    let err = Error::Login {
        service: "replication-service".into(),
        reason: "unknown principal".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains("replication-service"));
    assert!(msg.contains("unknown principal"));
}

#[test]
fn error_invalid_action_has_hint() {
    let msg = Error::InvalidAction("copy".into()).to_string();
    assert!(msg.contains("hint: valid actions are: add, delete, poll"));
}

#[test]
fn error_from_io() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn error_from_json() {
    let json_err = serde_json::from_str::<()>("invalid").unwrap_err();
    let err: Error = json_err.into();
    assert!(matches!(err, Error::Json(_)));
}
