// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Commands addressed to one agent.

use std::path::Path;

use rpl_core::Action;

use crate::cli::OutputFormat;
use crate::colors::Palette;
use crate::display;
use crate::error::{Error, Result};

/// Replicates `paths`; a response that is not successful fails the command.
pub fn execute(
    state_dir: &Path,
    agent: &str,
    action: Action,
    paths: &[String],
    principal: Option<&str>,
    output: OutputFormat,
) -> Result<()> {
    let response = super::connect(state_dir)?.execute(agent, principal, action, paths)?;
    match output {
        OutputFormat::Text => println!(
            "{}",
            display::format_response(agent, &response, Palette::detect())
        ),
        OutputFormat::Json => super::print_json(&response)?,
    }
    if response.successful {
        Ok(())
    } else {
        Err(Error::ReplicationFailed {
            agent: agent.to_string(),
            status: response.status,
        })
    }
}

pub fn enable(state_dir: &Path, agent: &str) -> Result<()> {
    super::connect(state_dir)?.enable(agent)?;
    println!("Enabled agent {}", agent);
    Ok(())
}

pub fn disable(state_dir: &Path, agent: &str) -> Result<()> {
    super::connect(state_dir)?.disable(agent)?;
    println!("Disabled agent {}", agent);
    Ok(())
}

pub fn queue(
    state_dir: &Path,
    agent: &str,
    queue: Option<&str>,
    offset: usize,
    limit: Option<usize>,
    output: OutputFormat,
) -> Result<()> {
    let snapshot = super::connect(state_dir)?.queue(agent, queue, offset, limit)?;
    match output {
        OutputFormat::Text => print!("{}", display::format_queue(&snapshot, Palette::detect())),
        OutputFormat::Json => super::print_json(&snapshot)?,
    }
    Ok(())
}
