// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use std::os::unix::net::UnixListener;
use std::thread::{self, JoinHandle};

use rpl_core::Action;
use rpl_ipc::{framing, DaemonRequest, DaemonResponse, ReplicationResponse, PROTOCOL_VERSION};
use tempfile::{tempdir, TempDir};

use super::client::DaemonClient;
use super::lifecycle::get_socket_path;
use crate::error::Error;

/// A stand-in daemon answering `connections` requests with `answer`.
struct FakeDaemon {
    dir: TempDir,
    handle: JoinHandle<Vec<DaemonRequest>>,
}

impl FakeDaemon {
    fn start<F>(connections: usize, answer: F) -> Self
    where
        F: Fn(&DaemonRequest) -> DaemonResponse + Send + 'static,
    {
        let dir = tempdir().unwrap();
        let listener = UnixListener::bind(get_socket_path(dir.path())).unwrap();
        let handle = thread::spawn(move || {
            let mut seen = Vec::new();
            for stream in listener.incoming().take(connections) {
                let mut stream = stream.unwrap();
                let request: DaemonRequest = framing::read_frame(&mut stream).unwrap();
                framing::write_frame(&mut stream, &answer(&request)).unwrap();
                seen.push(request);
            }
            seen
        });
        FakeDaemon { dir, handle }
    }

    fn client(&self) -> DaemonClient {
        DaemonClient::connect(&get_socket_path(self.dir.path())).unwrap()
    }

    fn requests(self) -> Vec<DaemonRequest> {
        self.handle.join().unwrap()
    }
}

#[test]
fn connect_without_socket_fails() {
    let dir = tempdir().unwrap();
    let err = DaemonClient::connect(&get_socket_path(dir.path()))
        .err()
        .unwrap();
    assert!(matches!(err, Error::DaemonNotRunning));
}

#[test]
fn ping_and_status_use_one_connection_each() {
    let daemon = FakeDaemon::start(2, |request| match request {
        DaemonRequest::Ping => DaemonResponse::Pong,
        _ => DaemonResponse::Status(rpl_ipc::DaemonStatus::new(42, 7, Vec::new())),
    });
    let client = daemon.client();

    client.ping().unwrap();
    let status = client.status().unwrap();

    assert_eq!(status.pid, 42);
    assert_eq!(status.uptime_secs, 7);
    assert_eq!(
        daemon.requests(),
        vec![DaemonRequest::Ping, DaemonRequest::Status]
    );
}

#[test]
fn execute_sends_the_request_fields() {
    let daemon = FakeDaemon::start(1, |_| DaemonResponse::Executed {
        response: ReplicationResponse::new("QUEUED", true),
    });

    let response = daemon
        .client()
        .execute(
            "publish",
            Some("editor"),
            Action::Delete,
            &["/content/a".to_string()],
        )
        .unwrap();

    assert!(response.successful);
    assert_eq!(
        daemon.requests(),
        vec![DaemonRequest::Execute {
            agent: "publish".to_string(),
            principal: Some("editor".to_string()),
            action: Action::Delete,
            paths: vec!["/content/a".to_string()],
        }]
    );
}

#[test]
fn daemon_errors_become_cli_errors() {
    let daemon = FakeDaemon::start(1, |_| DaemonResponse::error("unknown agent: 'x'"));

    let err = daemon.client().enable("x").unwrap_err();

    assert!(matches!(err, Error::Daemon(ref m) if m == "unknown agent: 'x'"));
    daemon.requests();
}

#[test]
fn unexpected_response_is_reported() {
    let daemon = FakeDaemon::start(1, |_| DaemonResponse::Pong);
    let err = daemon.client().disable("publish").unwrap_err();
    assert!(matches!(err, Error::UnexpectedResponse(_)));
    daemon.requests();
}

#[test]
fn hello_detects_version_mismatch() {
    let daemon = FakeDaemon::start(2, |request| match request {
        DaemonRequest::Hello { version } if version == PROTOCOL_VERSION => {
            DaemonResponse::Hello {
                version: "0.0.1".to_string(),
            }
        }
        _ => DaemonResponse::Pong,
    });
    let client = daemon.client();

    let err = client.hello().unwrap_err();

    assert!(matches!(
        err,
        Error::DaemonVersionMismatch { ref daemon_version, .. } if daemon_version == "0.0.1"
    ));
    client.ping().unwrap();
    daemon.requests();
}
