// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Utc;

#[test]
fn default_response_is_unsuccessful_without_status() {
    let response = ReplicationResponse::default();
    assert!(!response.successful);
    assert!(response.status.is_empty());
    assert_eq!(response.to_string(), "failed");
}

#[test]
fn response_from_queued_state() {
    let state = QueueItemState::queued(Utc::now());
    let response = ReplicationResponse::from(&state);
    assert_eq!(response, ReplicationResponse::new("QUEUED", true));
    assert_eq!(response.to_string(), "ok (QUEUED)");
}

#[test]
fn error_response_uses_error_state() {
    assert_eq!(ReplicationResponse::error(), ReplicationResponse::new("ERROR", false));
}
