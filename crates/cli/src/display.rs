// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Text rendering of daemon answers.

use rpl_ipc::{AgentStatus, DaemonStatus, QueueEntry, QueueSnapshot, ReplicationResponse};

use crate::colors::Palette;

/// Formats seconds as `1h 2m 3s`, omitting leading zero units.
pub fn format_uptime(secs: u64) -> String {
    let (hours, minutes, seconds) = (secs / 3600, secs % 3600 / 60, secs % 60);
    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

pub fn format_status(status: &DaemonStatus, palette: Palette) -> String {
    let mut out = format!(
        "Status: running\nPID: {}\nUptime: {}\n",
        status.pid,
        format_uptime(status.uptime_secs)
    );
    if status.agents.is_empty() {
        out.push_str("No agents configured.\n");
        return out;
    }
    out.push_str("Agents:\n");
    let width = status
        .agents
        .iter()
        .map(|a| a.name.len())
        .max()
        .unwrap_or(0);
    for agent in &status.agents {
        out.push_str(&format!(
            "  {:width$}  {}\n",
            agent.name,
            agent_summary(agent, palette)
        ));
    }
    out
}

fn agent_summary(agent: &AgentStatus, palette: Palette) -> String {
    let state = if agent.enabled {
        palette.good("enabled")
    } else {
        palette.bad("disabled")
    };
    let mut summary = format!("{state}  {} queued", agent.queued);
    if agent.passive {
        summary.push_str(&format!("  {}", palette.context("(passive)")));
    }
    summary
}

pub fn format_response(agent: &str, response: &ReplicationResponse, palette: Palette) -> String {
    let outcome = if response.successful {
        palette.good(&response.status)
    } else {
        palette.bad(&response.status)
    };
    format!("{agent}: {outcome}")
}

pub fn format_queue(snapshot: &QueueSnapshot, palette: Palette) -> String {
    let mut out = format!("Queue {} of agent {}", snapshot.queue, snapshot.agent);
    let shown = snapshot.entries.len();
    let total = snapshot.total.max(shown);
    if total == 0 {
        out.push_str(": empty\n");
        return out;
    }
    out.push_str(&format!(" ({} items", total));
    if shown == 0 {
        out.push_str(&format!(", none after {}", snapshot.offset));
    } else if shown < total {
        let first = snapshot.offset + 1;
        out.push_str(&format!(", showing {}-{}", first, snapshot.offset + shown));
    }
    out.push_str("):\n");
    for entry in &snapshot.entries {
        out.push_str(&format_entry(entry, palette));
        out.push('\n');
    }
    out
}

fn format_entry(entry: &QueueEntry, palette: Palette) -> String {
    let item = &entry.item;
    let mut line = format!("  {} {} {}", item.id, item.action, item.paths.join(", "));
    if let Some(state) = &entry.state {
        let mut detail = format!("{}", state.item_state);
        if state.attempts > 0 {
            detail.push_str(&format!(", {} attempts", state.attempts));
        }
        if let Some(entered) = state.entered {
            detail.push_str(&format!(", since {}", entered.format("%Y-%m-%d %H:%M:%S")));
        }
        line.push_str(&format!("  {}", palette.context(&format!("[{detail}]"))));
    }
    line
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
