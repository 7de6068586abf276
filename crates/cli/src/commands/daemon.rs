// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon management commands.

use std::path::Path;

use crate::cli::OutputFormat;
use crate::colors::Palette;
use crate::daemon;
use crate::display;
use crate::error::{Error, Result};

pub fn start(state_dir: &Path, config: Option<&Path>) -> Result<()> {
    match daemon::detect_daemon(state_dir)? {
        Some(info) => println!("Daemon is already running (PID: {})", info.pid),
        None => {
            let info = daemon::spawn_daemon(state_dir, config)?;
            println!("Daemon started (PID: {})", info.pid);
        }
    }
    Ok(())
}

pub fn stop(state_dir: &Path) -> Result<()> {
    if daemon::detect_daemon(state_dir)?.is_none() {
        println!("Daemon is not running.");
        return Ok(());
    }
    daemon::stop_daemon(state_dir)?;
    println!("Daemon stopped.");
    Ok(())
}

pub fn ping(state_dir: &Path) -> Result<()> {
    super::connect(state_dir)?.ping()?;
    println!("pong");
    Ok(())
}

pub fn status(state_dir: &Path, output: OutputFormat) -> Result<()> {
    let status = match super::connect(state_dir) {
        Ok(client) => client.status()?,
        Err(Error::DaemonNotRunning) => {
            println!("Status: not running");
            return Ok(());
        }
        Err(e) => return Err(e),
    };
    match output {
        OutputFormat::Text => print!("{}", display::format_status(&status, Palette::detect())),
        OutputFormat::Json => super::print_json(&status)?,
    }
    Ok(())
}
