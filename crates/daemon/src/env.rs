// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Environment variables read by the daemon.

use std::path::PathBuf;

/// Variable names, generated by `build.rs`.
pub mod names {
    include!(concat!(env!("OUT_DIR"), "/env_names.rs"));
}

/// Returns the value of `RPL_STATE_DIR` if set.
pub fn state_dir() -> Option<PathBuf> {
    std::env::var(names::RPL_STATE_DIR).ok().map(PathBuf::from)
}

/// Returns the value of `RPL_CONFIG` if set.
pub fn config_path() -> Option<PathBuf> {
    std::env::var(names::RPL_CONFIG).ok().map(PathBuf::from)
}

/// Returns the value of `XDG_STATE_HOME` if set.
pub fn xdg_state_home() -> Option<PathBuf> {
    std::env::var(names::XDG_STATE_HOME).ok().map(PathBuf::from)
}

/// State directory when none is given on the command line.
pub fn default_state_dir() -> PathBuf {
    if let Some(dir) = state_dir() {
        return dir;
    }
    if let Some(dir) = xdg_state_home() {
        return dir.join("rpl");
    }
    dirs::home_dir()
        .map(|h| h.join(".local/state/rpl"))
        .unwrap_or_else(|| PathBuf::from(".local/state/rpl"))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
