// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration.
//!
//! Configuration is read from `rpld.toml` in the state directory unless
//! another file is named on the command line or through `RPL_CONFIG`:
//!
//! ```toml
//! [worker]
//! interval_ms = 500
//!
//! [[agent]]
//! name = "publish"
//! service = "replication-service"
//! store = "file"
//! strategy = "priority"
//! priority_paths = ["/content/news"]
//!
//! [[agent.trigger]]
//! action = "poll"
//! path = "/content"
//! interval_ms = 60000
//!
//! [[agent.rule]]
//! principal = "editor"
//! prefix = "/content"
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;

use rpl_agent::{AccessRule, StuckQueueHandling};
use rpl_core::Action;
use serde::{Deserialize, Serialize};

use crate::error::{DaemonError, Result};

pub const CONFIG_FILE_NAME: &str = "rpld.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub worker: WorkerConfig,
    #[serde(default, rename = "agent")]
    pub agents: Vec<AgentConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkerConfig {
    /// Pause between two drain passes over all queues.
    #[serde(default = "default_worker_interval_ms")]
    pub interval_ms: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        WorkerConfig {
            interval_ms: default_worker_interval_ms(),
        }
    }
}

fn default_worker_interval_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Memory,
    File,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    #[default]
    Single,
    Priority,
    ErrorAware,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    pub name: String,
    /// Passive agents queue packages but never drain them.
    #[serde(default)]
    pub passive: bool,
    /// Whether the agent is enabled when the daemon starts.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Service principal of the agent's own contexts; the agent name when
    /// absent.
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub store: StoreKind,
    /// Export one package per request path (memory store only).
    #[serde(default)]
    pub split_paths: bool,
    #[serde(default)]
    pub strategy: StrategyKind,
    #[serde(default)]
    pub priority_paths: Vec<String>,
    #[serde(default = "default_attempts_threshold")]
    pub attempts_threshold: u32,
    #[serde(default)]
    pub stuck_queue: StuckQueueHandling,
    #[serde(default, rename = "trigger")]
    pub triggers: Vec<TriggerConfig>,
    /// Access rules; with none every request is permitted.
    #[serde(default, rename = "rule")]
    pub rules: Vec<AccessRule>,
}

fn default_true() -> bool {
    true
}

fn default_attempts_threshold() -> u32 {
    3
}

/// A schedule firing `(action, [path])` every `interval_ms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TriggerConfig {
    pub action: Action,
    pub path: String,
    pub interval_ms: u64,
}

impl Config {
    /// Loads and validates a config file.
    ///
    /// A missing file yields the default config, which has no agents.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!("no config at {}, starting without agents", path.display());
                return Ok(Config::default());
            }
            Err(source) => {
                return Err(DaemonError::ReadConfig {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config: Config = toml::from_str(&content).map_err(|source| DaemonError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the constraints serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.worker.interval_ms == 0 {
            return Err(invalid("worker interval_ms must be positive"));
        }

        let mut names = BTreeSet::new();
        for agent in &self.agents {
            let name = agent.name.trim();
            if name.is_empty() {
                return Err(invalid("agent name must not be empty"));
            }
            if !names.insert(name) {
                return Err(invalid(format!("duplicate agent name '{}'", name)));
            }
            agent.validate()?;
        }
        Ok(())
    }
}

impl AgentConfig {
    fn validate(&self) -> Result<()> {
        if self.strategy == StrategyKind::Priority && self.priority_paths.is_empty() {
            return Err(invalid(format!(
                "agent '{}' uses the priority strategy but has no priority_paths",
                self.name
            )));
        }
        if self.split_paths && self.store != StoreKind::Memory {
            return Err(invalid(format!(
                "agent '{}': split_paths needs the memory store",
                self.name
            )));
        }
        for trigger in &self.triggers {
            if trigger.interval_ms == 0 {
                return Err(invalid(format!(
                    "agent '{}': trigger interval_ms must be positive",
                    self.name
                )));
            }
            if trigger.path.is_empty() {
                return Err(invalid(format!(
                    "agent '{}': trigger path must not be empty",
                    self.name
                )));
            }
        }
        Ok(())
    }

    /// Service principal of the agent's own contexts.
    pub fn service_name(&self) -> &str {
        self.service.as_deref().unwrap_or(self.name.trim())
    }
}

fn invalid(message: impl Into<String>) -> DaemonError {
    DaemonError::InvalidConfig(message.into())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
