// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Talking to the rpld daemon.

mod client;
mod lifecycle;

pub use client::DaemonClient;
pub use lifecycle::{detect_daemon, get_socket_path, spawn_daemon, stop_daemon, DaemonInfo};

#[cfg(test)]
#[path = "client_tests.rs"]
mod client_tests;

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod lifecycle_tests;
