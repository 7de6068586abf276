// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! IPC client for the rpld daemon.
//!
//! The daemon answers one request per connection, so every call opens a
//! fresh stream.

use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rpl_core::Action;
use rpl_ipc::{
    framing, DaemonRequest, DaemonResponse, DaemonStatus, QueueSnapshot, ReplicationResponse,
    PROTOCOL_VERSION,
};

use crate::error::{Error, Result};

/// Connection timeout for daemon communication.
const TIMEOUT_SECS: u64 = 5;

pub struct DaemonClient {
    socket_path: PathBuf,
}

impl DaemonClient {
    /// Creates a client for the daemon listening at `socket_path`.
    ///
    /// Fails with [`Error::DaemonNotRunning`] when there is no socket.
    pub fn connect(socket_path: &Path) -> Result<Self> {
        if !socket_path.exists() {
            return Err(Error::DaemonNotRunning);
        }
        Ok(DaemonClient {
            socket_path: socket_path.to_path_buf(),
        })
    }

    /// Sends a request and receives the response.
    fn request(&self, request: &DaemonRequest) -> Result<DaemonResponse> {
        let mut stream = UnixStream::connect(&self.socket_path)
            .map_err(|e| Error::Daemon(format!("failed to connect to daemon: {}", e)))?;
        stream.set_read_timeout(Some(Duration::from_secs(TIMEOUT_SECS)))?;
        stream.set_write_timeout(Some(Duration::from_secs(TIMEOUT_SECS)))?;

        framing::write_frame(&mut stream, request)?;
        let response = framing::read_frame(&mut stream)?;
        match response {
            DaemonResponse::Error { message } => Err(Error::Daemon(message)),
            response => Ok(response),
        }
    }

    pub fn ping(&self) -> Result<()> {
        match self.request(&DaemonRequest::Ping)? {
            DaemonResponse::Pong => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    /// Exchanges versions and fails if the daemon runs a different build.
    pub fn hello(&self) -> Result<()> {
        let request = DaemonRequest::Hello {
            version: PROTOCOL_VERSION.to_string(),
        };
        match self.request(&request)? {
            DaemonResponse::Hello { version } if version == PROTOCOL_VERSION => Ok(()),
            DaemonResponse::Hello { version } => Err(Error::DaemonVersionMismatch {
                daemon_version: version,
                cli_version: PROTOCOL_VERSION.to_string(),
            }),
            other => Err(unexpected(other)),
        }
    }

    pub fn status(&self) -> Result<DaemonStatus> {
        match self.request(&DaemonRequest::Status)? {
            DaemonResponse::Status(status) => Ok(status),
            other => Err(unexpected(other)),
        }
    }

    pub fn shutdown(&self) -> Result<()> {
        match self.request(&DaemonRequest::Shutdown)? {
            DaemonResponse::ShuttingDown => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    pub fn execute(
        &self,
        agent: &str,
        principal: Option<&str>,
        action: Action,
        paths: &[String],
    ) -> Result<ReplicationResponse> {
        let request = DaemonRequest::Execute {
            agent: agent.to_string(),
            principal: principal.map(str::to_string),
            action,
            paths: paths.to_vec(),
        };
        match self.request(&request)? {
            DaemonResponse::Executed { response } => Ok(response),
            other => Err(unexpected(other)),
        }
    }

    pub fn enable(&self, agent: &str) -> Result<()> {
        self.expect_ok(DaemonRequest::Enable {
            agent: agent.to_string(),
        })
    }

    pub fn disable(&self, agent: &str) -> Result<()> {
        self.expect_ok(DaemonRequest::Disable {
            agent: agent.to_string(),
        })
    }

    pub fn queue(
        &self,
        agent: &str,
        queue: Option<&str>,
        offset: usize,
        limit: Option<usize>,
    ) -> Result<QueueSnapshot> {
        let request = DaemonRequest::Queue {
            agent: agent.to_string(),
            queue: queue.map(str::to_string),
            offset,
            limit,
        };
        match self.request(&request)? {
            DaemonResponse::Queue(snapshot) => Ok(snapshot),
            other => Err(unexpected(other)),
        }
    }

    fn expect_ok(&self, request: DaemonRequest) -> Result<()> {
        match self.request(&request)? {
            DaemonResponse::Ok => Ok(()),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(response: DaemonResponse) -> Error {
    Error::UnexpectedResponse(format!("{:?}", response))
}
