// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use rpl_core::{Action, ExecutionContext, ReplicationRequest};
use tempfile::TempDir;

fn build(content: &str) -> (TempDir, Registry) {
    let temp = TempDir::new().unwrap();
    let config: Config = toml::from_str(content).unwrap();
    config.validate().unwrap();
    let registry = Registry::build(&config, temp.path()).unwrap();
    (temp, registry)
}

#[test]
fn agents_start_disabled() {
    let (_temp, registry) = build("[[agent]]\nname = \"publish\"\n");
    assert!(!registry.get("publish").unwrap().is_enabled());
}

#[test]
fn enable_configured_skips_agents_configured_off() {
    let (_temp, registry) = build(
        "[[agent]]\nname = \"publish\"\n\n[[agent]]\nname = \"reverse\"\nenabled = false\n",
    );

    assert_eq!(registry.enable_configured(), 1);
    assert!(registry.get("publish").unwrap().is_enabled());
    assert!(!registry.get("reverse").unwrap().is_enabled());
}

#[test]
fn passive_agent_is_not_processed() {
    let (_temp, registry) = build("[[agent]]\nname = \"reverse\"\npassive = true\n");
    registry.enable_configured();

    assert!(registry.get("reverse").unwrap().is_passive());
    assert!(!registry.provider().is_processing("reverse"));
}

#[test]
fn disable_all_releases_queue_processing() {
    let (_temp, registry) = build("[[agent]]\nname = \"publish\"\n");
    registry.enable_configured();
    assert!(registry.provider().is_processing("publish"));

    registry.disable_all();

    assert!(!registry.provider().is_processing("publish"));
    assert!(!registry.get("publish").unwrap().is_enabled());
}

#[test]
fn status_reports_queue_length() {
    let (_temp, registry) = build("[[agent]]\nname = \"publish\"\n");
    registry.enable_configured();
    let agent = registry.get("publish").unwrap();
    agent
        .execute(
            &ExecutionContext::new("publish"),
            &ReplicationRequest::new(Action::Add, ["/content/a"]),
        )
        .unwrap();

    let status = registry.status();

    assert_eq!(
        status,
        vec![AgentStatus {
            name: "publish".to_string(),
            enabled: true,
            passive: false,
            queued: 1,
        }]
    );
}

#[test]
fn file_store_lives_under_the_agent_directory() {
    let (temp, registry) = build("[[agent]]\nname = \"publish\"\nstore = \"file\"\n");
    registry.enable_configured();
    let agent = registry.get("publish").unwrap();

    agent
        .execute(
            &ExecutionContext::new("publish"),
            &ReplicationRequest::new(Action::Add, ["/content/a"]),
        )
        .unwrap();
    let packages = temp.path().join("agents/publish/packages");
    assert_eq!(std::fs::read_dir(&packages).unwrap().count(), 1);

    let report = registry.provider().drain("publish");

    assert_eq!(report.processed, 1);
    assert_eq!(std::fs::read_dir(&packages).unwrap().count(), 0);
    let journal = rpl_agent::read_journal(&temp.path().join("agents/publish/journal.jsonl"))
        .unwrap();
    assert_eq!(journal.len(), 1);
    assert_eq!(journal[0].paths, vec!["/content/a"]);
}

#[test]
fn stored_packages_are_requeued_after_a_restart() {
    const CONFIG: &str = "[[agent]]\nname = \"publish\"\nstore = \"file\"\n";
    let (temp, registry) = build(CONFIG);
    registry
        .get("publish")
        .unwrap()
        .execute(
            &ExecutionContext::new("publish"),
            &ReplicationRequest::new(Action::Add, ["/content/a"]),
        )
        .unwrap();
    drop(registry);

    let config: Config = toml::from_str(CONFIG).unwrap();
    let registry = Registry::build(&config, temp.path()).unwrap();
    registry.enable_configured();

    assert_eq!(registry.status()[0].queued, 1);
    let report = registry.provider().drain("publish");
    assert_eq!(report.processed, 1);
    let packages = temp.path().join("agents/publish/packages");
    assert_eq!(std::fs::read_dir(&packages).unwrap().count(), 0);
    let journal = rpl_agent::read_journal(&temp.path().join("agents/publish/journal.jsonl"))
        .unwrap();
    assert_eq!(journal.len(), 1);
    assert_eq!(journal[0].paths, vec!["/content/a"]);
}

#[test]
fn configured_rules_restrict_callers() {
    let (_temp, registry) = build(
        "[[agent]]\nname = \"publish\"\n\n[[agent.rule]]\nprincipal = \"editor\"\nprefix = \"/content\"\n",
    );
    registry.enable_configured();
    let agent = registry.get("publish").unwrap();
    let request = ReplicationRequest::new(Action::Add, ["/content/a"]);

    assert!(agent.execute(&ExecutionContext::new("editor"), &request).is_ok());
    assert!(agent
        .execute(&ExecutionContext::new("guest"), &request)
        .is_err());
}

#[test]
fn scheduled_triggers_are_registered_on_enable() {
    let (_temp, registry) = build(
        "[[agent]]\nname = \"publish\"\n\n[[agent.trigger]]\naction = \"poll\"\npath = \"/content\"\ninterval_ms = 3600000\n",
    );

    assert_eq!(registry.enable_configured(), 1);
    registry.disable_all();
}

#[test]
fn worker_starts_and_stops() {
    let (_temp, registry) = build("");
    let worker = registry.start_worker(Duration::from_millis(10)).unwrap();
    assert!(worker.is_running());
    worker.stop();
}
