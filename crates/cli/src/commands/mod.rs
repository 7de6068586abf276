// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod agent;
pub mod daemon;

use std::path::Path;

use crate::daemon::{get_socket_path, DaemonClient};
use crate::error::Result;

/// Connects to the daemon and checks that it speaks our protocol version.
fn connect(state_dir: &Path) -> Result<DaemonClient> {
    let client = DaemonClient::connect(&get_socket_path(state_dir))?;
    client.hello()?;
    Ok(client)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
