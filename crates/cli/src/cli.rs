// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use rpl_core::Action;

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

const QUICKSTART_HELP: &str = "\
Get started:
  rpl start                                Start the daemon
  rpl status                               List configured agents
  rpl execute publish add /content/a       Replicate a path
  rpl queue publish                        Show what is waiting
  rpl stop                                 Stop the daemon";

#[derive(Parser, Debug)]
#[command(name = "rpl")]
#[command(about = "Control the rpld content replication daemon")]
#[command(version)]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    /// Daemon state directory [default: $RPL_STATE_DIR or ~/.local/state/rpl]
    #[arg(long, global = true, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Start the daemon in the background
    Start {
        /// Configuration file passed to rpld
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Stop the daemon
    Stop,

    /// Check that the daemon answers
    Ping,

    /// Show daemon and agent status
    Status {
        #[arg(long, short, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Replicate paths through an agent
    #[command(after_help = "Examples:\n  \
        rpl execute publish add /content/a /content/b   Replicate two paths\n  \
        rpl execute publish delete /content/old         Remove at the destination\n  \
        rpl execute reverse poll /content --as admin    Poll as another principal")]
    Execute {
        /// Agent name
        agent: String,

        /// Action: add, delete or poll
        #[arg(value_parser = parse_action)]
        action: Action,

        /// Content paths
        #[arg(required = true)]
        paths: Vec<String>,

        /// Principal the request is authorized as [default: the agent's service]
        #[arg(long = "as", value_name = "PRINCIPAL")]
        principal: Option<String>,

        #[arg(long, short, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Enable an agent
    Enable {
        /// Agent name
        agent: String,
    },

    /// Disable an agent
    Disable {
        /// Agent name
        agent: String,
    },

    /// Show the items waiting on an agent queue
    Queue {
        /// Agent name
        agent: String,

        /// Queue name [default: the agent's default queue]
        #[arg(long, short)]
        queue: Option<String>,

        /// Entries to skip from the head of the queue
        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Entries to show [default: 100, at most 500]
        #[arg(long, short = 'n')]
        limit: Option<usize>,

        #[arg(long, short, value_enum, default_value_t)]
        output: OutputFormat,
    },
}

fn parse_action(s: &str) -> Result<Action, String> {
    s.parse::<Action>().map_err(|e| e.to_string())
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
