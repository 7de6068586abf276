// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! rpl_cli - command-line client for the rpld replication daemon.
//!
//! The `rpl` binary starts and stops the daemon and forwards agent commands
//! to it over its Unix socket.

mod cli;
pub mod colors;
mod commands;
mod daemon;
mod display;
pub mod env;
pub mod error;

pub use cli::{Cli, Command, OutputFormat};
pub use daemon::{DaemonClient, DaemonInfo};
pub use error::{Error, Result};

/// Runs one parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let state_dir = cli.state_dir.unwrap_or_else(env::default_state_dir);
    match cli.command {
        Command::Start { config } => commands::daemon::start(&state_dir, config.as_deref()),
        Command::Stop => commands::daemon::stop(&state_dir),
        Command::Ping => commands::daemon::ping(&state_dir),
        Command::Status { output } => commands::daemon::status(&state_dir, output),
        Command::Execute {
            agent,
            action,
            paths,
            principal,
            output,
        } => commands::agent::execute(
            &state_dir,
            &agent,
            action,
            &paths,
            principal.as_deref(),
            output,
        ),
        Command::Enable { agent } => commands::agent::enable(&state_dir, &agent),
        Command::Disable { agent } => commands::agent::disable(&state_dir, &agent),
        Command::Queue {
            agent,
            queue,
            offset,
            limit,
            output,
        } => commands::agent::queue(&state_dir, &agent, queue.as_deref(), offset, limit, output),
    }
}
