// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use std::io::Cursor;

use super::framing::{encode, read_frame, write_frame, FrameError, MAX_FRAME_SIZE};
use super::*;
use rpl_core::PackageInfo;
use yare::parameterized;

fn execute() -> DaemonRequest {
    DaemonRequest::Execute {
        agent: "publish".to_string(),
        principal: Some("editor".to_string()),
        action: Action::Add,
        paths: vec!["/content/a".to_string()],
    }
}

fn snapshot() -> QueueSnapshot {
    QueueSnapshot {
        agent: "publish".to_string(),
        queue: "default".to_string(),
        total: 1,
        offset: 0,
        entries: vec![QueueEntry {
            item: ReplicationQueueItem {
                id: "pkg-0a1b2c3d".to_string(),
                paths: vec!["/content/a".to_string()],
                action: Action::Delete,
                package_type: "memory".to_string(),
                info: PackageInfo::new(),
            },
            state: None,
        }],
    }
}

#[parameterized(
    ping = { DaemonRequest::Ping },
    hello = { DaemonRequest::Hello { version: PROTOCOL_VERSION.to_string() } },
    execute = { super::execute() },
    enable = { DaemonRequest::Enable { agent: "publish".to_string() } },
    queue_default = { DaemonRequest::Queue { agent: "publish".to_string(), queue: None, offset: 0, limit: None } },
    queue_named = { DaemonRequest::Queue { agent: "publish".to_string(), queue: Some("error".to_string()), offset: 0, limit: None } },
    queue_page = { DaemonRequest::Queue { agent: "publish".to_string(), queue: None, offset: 20, limit: Some(10) } },
)]
fn request_frames_decode_to_the_same_request(request: DaemonRequest) {
    let mut buf = Vec::new();
    write_frame(&mut buf, &request).unwrap();

    let decoded: DaemonRequest = read_frame(&mut Cursor::new(buf)).unwrap();
    assert_eq!(decoded, request);
}

#[parameterized(
    executed = { DaemonResponse::Executed { response: ReplicationResponse::new("QUEUED", true) } },
    status = { DaemonResponse::Status(DaemonStatus::new(42, 7, vec![AgentStatus { name: "publish".to_string(), enabled: true, passive: false, queued: 3 }])) },
    queue = { DaemonResponse::Queue(snapshot()) },
    error = { DaemonResponse::error("no such agent") },
)]
fn response_frames_decode_to_the_same_response(response: DaemonResponse) {
    let frame = encode(&response).unwrap();
    let decoded: DaemonResponse = read_frame(&mut Cursor::new(frame)).unwrap();
    assert_eq!(decoded, response);
}

#[test]
fn requests_are_tagged_by_type() {
    let json = serde_json::to_value(DaemonRequest::Disable {
        agent: "publish".to_string(),
    })
    .unwrap();
    assert_eq!(json["type"], "Disable");
    assert_eq!(json["agent"], "publish");
}

#[test]
fn queue_request_without_paging_fields_decodes() {
    let json = r#"{"type":"Queue","agent":"publish"}"#;
    let request: DaemonRequest = serde_json::from_str(json).unwrap();
    assert_eq!(
        request,
        DaemonRequest::Queue {
            agent: "publish".to_string(),
            queue: None,
            offset: 0,
            limit: None,
        }
    );
}

#[test]
fn execute_without_principal_omits_it() {
    let json = r#"{"type":"Execute","agent":"publish","action":"delete","paths":["/a"]}"#;
    let request: DaemonRequest = serde_json::from_str(json).unwrap();
    assert_eq!(
        request,
        DaemonRequest::Execute {
            agent: "publish".to_string(),
            principal: None,
            action: Action::Delete,
            paths: vec!["/a".to_string()],
        }
    );
    assert!(!serde_json::to_string(&request).unwrap().contains("principal"));
}

#[test]
fn frame_header_is_big_endian_length() {
    let frame = encode(&DaemonRequest::Ping).unwrap();
    let payload = br#"{"type":"Ping"}"#;
    assert_eq!(&frame[..4], &(payload.len() as u32).to_be_bytes());
    assert_eq!(&frame[4..], payload);
}

#[test]
fn oversized_frame_is_rejected_before_reading_payload() {
    let header = ((MAX_FRAME_SIZE + 1) as u32).to_be_bytes();
    let err = read_frame::<_, DaemonRequest>(&mut Cursor::new(header.to_vec())).unwrap_err();
    assert!(matches!(err, FrameError::TooLarge { .. }));
}

#[test]
fn truncated_frame_is_a_disconnect() {
    let mut frame = encode(&execute()).unwrap();
    frame.truncate(frame.len() - 3);

    let err = read_frame::<_, DaemonRequest>(&mut Cursor::new(frame)).unwrap_err();
    assert!(err.is_disconnect());
}

#[test]
fn garbage_payload_is_a_decode_error() {
    let mut frame = 3u32.to_be_bytes().to_vec();
    frame.extend_from_slice(b"{{{");

    let err = read_frame::<_, DaemonRequest>(&mut Cursor::new(frame)).unwrap_err();
    assert!(matches!(err, FrameError::Decode(_)));
}

#[test]
fn two_frames_read_back_in_order() {
    let mut buf = Vec::new();
    write_frame(&mut buf, &DaemonRequest::Ping).unwrap();
    write_frame(&mut buf, &DaemonRequest::Shutdown).unwrap();

    let mut cursor = Cursor::new(buf);
    let first: DaemonRequest = read_frame(&mut cursor).unwrap();
    let second: DaemonRequest = read_frame(&mut cursor).unwrap();
    assert_eq!(first, DaemonRequest::Ping);
    assert_eq!(second, DaemonRequest::Shutdown);
}
