// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared IPC protocol between the `rpl` CLI and the `rpld` daemon.
//!
//! Messages are JSON documents sent over a Unix socket, each preceded by
//! its length as a 4-byte big-endian integer.

use serde::{Deserialize, Serialize};

pub use rpl_core::{Action, QueueItemState, ReplicationQueueItem, ReplicationResponse};

/// Version both sides exchange in the `Hello` handshake.
pub const PROTOCOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Queue entries returned when a `Queue` request sets no limit.
pub const DEFAULT_QUEUE_LIMIT: usize = 100;

/// Most queue entries one `Queue` response carries.
pub const MAX_QUEUE_LIMIT: usize = 500;

/// Request sent from CLI to daemon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum DaemonRequest {
    /// Liveness check.
    Ping,
    /// Version handshake.
    Hello { version: String },
    /// Daemon and agent status.
    Status,
    /// Graceful shutdown.
    Shutdown,
    /// Run a replication request through an agent.
    Execute {
        agent: String,
        /// Principal the request is authorized for. The daemon uses the
        /// agent's service principal when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        principal: Option<String>,
        action: Action,
        paths: Vec<String>,
    },
    /// Enable an agent.
    Enable { agent: String },
    /// Disable an agent.
    Disable { agent: String },
    /// List the items of an agent's queue; the default queue when `queue`
    /// is absent.
    ///
    /// At most `limit` entries are returned, starting `offset` entries from
    /// the head. The limit defaults to [`DEFAULT_QUEUE_LIMIT`] and is capped
    /// at [`MAX_QUEUE_LIMIT`].
    Queue {
        agent: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        queue: Option<String>,
        #[serde(default)]
        offset: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        limit: Option<usize>,
    },
}

/// Response sent from daemon to CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum DaemonResponse {
    Pong,
    Hello { version: String },
    Status(DaemonStatus),
    ShuttingDown,
    /// Outcome of an `Execute` request.
    Executed { response: ReplicationResponse },
    /// The request was carried out and has nothing to report.
    Ok,
    Queue(QueueSnapshot),
    Error { message: String },
}

impl DaemonResponse {
    pub fn error(message: impl Into<String>) -> Self {
        DaemonResponse::Error {
            message: message.into(),
        }
    }
}

/// Daemon status information.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DaemonStatus {
    pub pid: u32,
    pub uptime_secs: u64,
    /// Configured agents, in configuration order.
    #[serde(default)]
    pub agents: Vec<AgentStatus>,
}

impl DaemonStatus {
    pub fn new(pid: u32, uptime_secs: u64, agents: Vec<AgentStatus>) -> Self {
        DaemonStatus {
            pid,
            uptime_secs,
            agents,
        }
    }
}

/// Summary of one agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentStatus {
    pub name: String,
    pub enabled: bool,
    pub passive: bool,
    /// Items waiting on the default queue.
    pub queued: usize,
}

/// One page of an agent queue at the time of the request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueueSnapshot {
    pub agent: String,
    pub queue: String,
    /// Items on the whole queue.
    #[serde(default)]
    pub total: usize,
    /// Position of the first entry, counted from the head.
    #[serde(default)]
    pub offset: usize,
    pub entries: Vec<QueueEntry>,
}

/// A queued item and its state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueueEntry {
    pub item: ReplicationQueueItem,
    pub state: Option<QueueItemState>,
}

/// Length-prefixed message framing.
///
/// A frame is a 4-byte big-endian payload length followed by that many
/// bytes of JSON.
pub mod framing {
    use std::io::{self, Read, Write};

    use serde::de::DeserializeOwned;
    use serde::Serialize;
    use thiserror::Error;

    /// Largest payload accepted, so a corrupt length cannot exhaust memory.
    pub const MAX_FRAME_SIZE: usize = 1024 * 1024;

    #[derive(Debug, Error)]
    pub enum FrameError {
        #[error("io error: {0}")]
        Io(#[from] io::Error),
        #[error("frame too large: {len} bytes (max {max})")]
        TooLarge { len: usize, max: usize },
        #[error("cannot encode message: {0}")]
        Encode(serde_json::Error),
        #[error("cannot decode message: {0}")]
        Decode(serde_json::Error),
    }

    impl FrameError {
        /// Whether the peer closed the connection before a full frame arrived.
        pub fn is_disconnect(&self) -> bool {
            matches!(self, FrameError::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof)
        }
    }

    /// Serializes `message` into a complete frame.
    pub fn encode<T: Serialize>(message: &T) -> Result<Vec<u8>, FrameError> {
        let payload = serde_json::to_vec(message).map_err(FrameError::Encode)?;
        let len = u32::try_from(payload.len())
            .ok()
            .filter(|len| *len as usize <= MAX_FRAME_SIZE)
            .ok_or(FrameError::TooLarge {
                len: payload.len(),
                max: MAX_FRAME_SIZE,
            })?;

        let mut frame = Vec::with_capacity(4 + payload.len());
        frame.extend_from_slice(&len.to_be_bytes());
        frame.extend_from_slice(&payload);
        Ok(frame)
    }

    /// Writes one framed message and flushes.
    pub fn write_frame<W: Write, T: Serialize>(writer: &mut W, message: &T) -> Result<(), FrameError> {
        writer.write_all(&encode(message)?)?;
        writer.flush()?;
        Ok(())
    }

    /// Reads one framed message.
    pub fn read_frame<R: Read, T: DeserializeOwned>(reader: &mut R) -> Result<T, FrameError> {
        let mut header = [0u8; 4];
        reader.read_exact(&mut header)?;
        let len = u32::from_be_bytes(header) as usize;
        if len > MAX_FRAME_SIZE {
            return Err(FrameError::TooLarge {
                len,
                max: MAX_FRAME_SIZE,
            });
        }

        let mut payload = vec![0u8; len];
        reader.read_exact(&mut payload)?;
        serde_json::from_slice(&payload).map_err(FrameError::Decode)
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
