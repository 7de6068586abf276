// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use rpl_core::{Action, PackageInfo};
use std::time::Instant;

fn item(id: &str) -> ReplicationQueueItem {
    ReplicationQueueItem {
        id: id.to_string(),
        paths: vec![format!("/content/{id}")],
        action: Action::Add,
        package_type: "memory".to_string(),
        info: PackageInfo::new(),
    }
}

/// Processor that records what it sees and fails ids listed in `fail`.
#[derive(Default)]
struct ScriptedProcessor {
    seen: Mutex<Vec<(String, ReplicationQueueItem)>>,
    fail: Mutex<Vec<String>>,
}

impl ScriptedProcessor {
    fn failing(ids: &[&str]) -> Self {
        ScriptedProcessor {
            fail: Mutex::new(ids.iter().map(|s| s.to_string()).collect()),
            ..ScriptedProcessor::default()
        }
    }

    fn seen_ids(&self) -> Vec<String> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|(_, item)| item.id.clone())
            .collect()
    }
}

impl QueueProcessor for ScriptedProcessor {
    fn process(&self, queue_name: &str, item: &ReplicationQueueItem) -> bool {
        self.seen
            .lock()
            .unwrap()
            .push((queue_name.to_string(), item.clone()));
        !self.fail.lock().unwrap().contains(&item.id)
    }
}

#[test]
fn queue_is_fifo() {
    let queue = MemoryQueue::new("default");
    assert!(queue.is_empty());

    assert!(queue.add(item("a")).unwrap());
    assert!(queue.add(item("b")).unwrap());

    assert_eq!(queue.head().unwrap().id, "a");
    let ids: Vec<_> = queue.items().into_iter().map(|i| i.id).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(queue.len(), 2);
}

#[test]
fn queue_refuses_duplicate_ids() {
    let queue = MemoryQueue::new("default");
    assert!(queue.add(item("a")).unwrap());
    assert!(!queue.add(item("a")).unwrap());
    assert_eq!(queue.len(), 1);
}

#[test]
fn added_item_is_queued_with_no_attempts() {
    let queue = MemoryQueue::new("default");
    queue.add(item("a")).unwrap();

    let state = queue.status("a").unwrap();
    assert_eq!(state.item_state, ItemState::Queued);
    assert!(state.successful);
    assert_eq!(state.attempts, 0);
    assert!(state.entered.is_some());
    assert!(queue.status("missing").is_none());
}

#[test]
fn removed_item_is_reported_dropped() {
    let queue = MemoryQueue::new("default");
    queue.add(item("a")).unwrap();

    assert_eq!(queue.remove("a").unwrap().id, "a");
    assert!(queue.remove("a").is_none());
    assert!(queue.is_empty());
    assert_eq!(queue.status("a").unwrap().item_state, ItemState::Dropped);
}

#[test]
fn finished_states_are_bounded() {
    let queue = MemoryQueue::new("default");
    for n in 0..=FINISHED_STATES_RETAINED {
        let id = format!("i{n}");
        queue.add(item(&id)).unwrap();
        queue.remove(&id).unwrap();
    }

    assert!(queue.status("i0").is_none());
    assert_eq!(queue.status("i1").unwrap().item_state, ItemState::Dropped);
    let last = format!("i{FINISHED_STATES_RETAINED}");
    assert_eq!(queue.status(&last).unwrap().item_state, ItemState::Dropped);
    let state = queue.lock();
    assert_eq!(state.finished.len(), FINISHED_STATES_RETAINED);
    assert_eq!(state.finished_order.len(), FINISHED_STATES_RETAINED);
}

#[test]
fn requeued_item_leaves_the_finished_states() {
    let queue = MemoryQueue::new("default");
    queue.add(item("a")).unwrap();
    queue.remove("a").unwrap();

    queue.add(item("a")).unwrap();

    assert_eq!(queue.status("a").unwrap().item_state, ItemState::Queued);
    assert!(queue.lock().finished_order.is_empty());
}

#[test]
fn provider_returns_the_same_queue_for_the_same_key() {
    let provider = MemoryQueueProvider::new();
    provider.queue("agent", "q").unwrap().add(item("a")).unwrap();

    assert_eq!(provider.queue("agent", "q").unwrap().head().unwrap().id, "a");
    assert!(provider.queue("other", "q").unwrap().is_empty());
    assert_eq!(provider.default_queue("agent").unwrap().name(), "default");
}

#[test]
fn provider_rejects_empty_queue_names() {
    let provider = MemoryQueueProvider::new();
    let err = provider.queue("agent", " ").err().unwrap();
    assert!(matches!(err, Error::Queue(_)));
}

#[test]
fn drain_without_processor_leaves_items_queued() {
    let provider = MemoryQueueProvider::new();
    provider.default_queue("agent").unwrap().add(item("a")).unwrap();

    assert_eq!(provider.drain("agent"), DrainReport::default());
    assert_eq!(provider.default_queue("agent").unwrap().items().len(), 1);
}

#[test]
fn drain_processes_items_in_order_and_tags_them() {
    let provider = MemoryQueueProvider::new();
    let processor = Arc::new(ScriptedProcessor::default());
    provider
        .enable_queue_processing("agent", processor.clone())
        .unwrap();
    let queue = provider.default_queue("agent").unwrap();
    queue.add(item("a")).unwrap();
    queue.add(item("b")).unwrap();

    let report = provider.drain("agent");

    assert_eq!(report, DrainReport { processed: 2, failed: 0 });
    assert_eq!(processor.seen_ids(), vec!["a", "b"]);
    let (queue_name, first) = processor.seen.lock().unwrap()[0].clone();
    assert_eq!(queue_name, "default");
    assert_eq!(first.info.get(INFO_QUEUE_NAME), Some("default"));
    assert_eq!(first.info.get(INFO_QUEUE_ATTEMPTS), Some("0"));
    assert!(queue.is_empty());
    assert_eq!(queue.status("a").unwrap().item_state, ItemState::Succeeded);
}

#[test]
fn failed_item_blocks_its_queue_and_counts_attempts() {
    let provider = MemoryQueueProvider::new();
    let processor = Arc::new(ScriptedProcessor::failing(&["a"]));
    provider
        .enable_queue_processing("agent", processor.clone())
        .unwrap();
    let queue = provider.default_queue("agent").unwrap();
    queue.add(item("a")).unwrap();
    queue.add(item("b")).unwrap();

    assert_eq!(provider.drain("agent"), DrainReport { processed: 0, failed: 1 });
    assert_eq!(provider.drain("agent"), DrainReport { processed: 0, failed: 1 });

    assert_eq!(processor.seen_ids(), vec!["a", "a"]);
    let state = queue.status("a").unwrap();
    assert_eq!(state.item_state, ItemState::Error);
    assert!(!state.successful);
    assert_eq!(state.attempts, 2);
    assert_eq!(queue.items().len(), 2);
    let last = processor.seen.lock().unwrap()[1].1.clone();
    assert_eq!(last.info.get(INFO_QUEUE_ATTEMPTS), Some("1"));
}

#[test]
fn failure_on_one_queue_does_not_block_another() {
    let provider = MemoryQueueProvider::new();
    let processor = Arc::new(ScriptedProcessor::failing(&["a"]));
    provider
        .enable_queue_processing("agent", processor.clone())
        .unwrap();
    provider.queue("agent", "default").unwrap().add(item("a")).unwrap();
    provider.queue("agent", "priority").unwrap().add(item("b")).unwrap();

    let report = provider.drain("agent");

    assert_eq!(report, DrainReport { processed: 1, failed: 1 });
}

#[test]
fn disabling_processing_stops_draining() {
    let provider = MemoryQueueProvider::new();
    let processor = Arc::new(ScriptedProcessor::default());
    provider.enable_queue_processing("agent", processor).unwrap();
    assert!(provider.is_processing("agent"));

    provider.disable_queue_processing("agent").unwrap();
    provider.default_queue("agent").unwrap().add(item("a")).unwrap();

    assert!(!provider.is_processing("agent"));
    assert_eq!(provider.drain_all(), DrainReport::default());
}

#[test]
fn worker_drains_in_the_background() {
    let provider = Arc::new(MemoryQueueProvider::new());
    let processor = Arc::new(ScriptedProcessor::default());
    provider
        .enable_queue_processing("agent", processor.clone())
        .unwrap();
    provider.default_queue("agent").unwrap().add(item("a")).unwrap();

    let worker = provider.spawn_worker(Duration::from_millis(10)).unwrap();
    assert!(worker.is_running());

    let deadline = Instant::now() + Duration::from_secs(5);
    while processor.seen_ids().is_empty() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    worker.stop();

    assert_eq!(processor.seen_ids(), vec!["a"]);
    assert!(provider.default_queue("agent").unwrap().is_empty());
}
