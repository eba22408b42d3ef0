// tests/context_management_tests.rs
mod common;

use common::*;
use serial_test::serial;
use templar::{ContextKey, ContextPatch, ContextStore, Stage, StagesQueue, StepSlot};

const NAME: ContextKey<String> = ContextKey::new("templateName");
const COUNT: ContextKey<u32> = ContextKey::new("count");
const SEEN: ContextKey<Vec<String>> = ContextKey::new("seen");

fn recording_step(label: &'static str) -> StepSlot<TestError> {
  StepSlot::new(move |stage: Stage| async move {
    let manager = stage.manager();
    let mut seen = manager.get_storage(SEEN, Vec::new());
    seen.push(format!("{}:{}", label, manager.get_storage(NAME, "unset".to_string())));
    manager.set_storages(ContextPatch::new().set(SEEN, seen));
    Ok::<_, TestError>(stage.next_code())
  })
}

#[tokio::test]
#[serial]
async fn test_seeded_values_are_visible_to_the_first_step() {
  setup_tracing();
  let queue = StagesQueue::new([recording_step("first")]);
  queue.set_storages(ContextPatch::new().set(NAME, "Rust".to_string()));

  let store = queue.exec().await.unwrap();
  assert_eq!(store.get(SEEN, Vec::new()), vec!["first:Rust".to_string()]);
}

#[tokio::test]
#[serial]
async fn test_later_steps_see_earlier_answers() {
  setup_tracing();
  let naming = StepSlot::new(|stage: Stage| async move {
    stage
      .manager()
      .set_storages(ContextPatch::new().set(NAME, "Python".to_string()));
    Ok::<_, TestError>(stage.next_code())
  });
  let queue = StagesQueue::new([recording_step("before"), naming, recording_step("after")]);

  let store = queue.exec().await.unwrap();
  assert_eq!(
    store.get(SEEN, Vec::new()),
    vec!["before:unset".to_string(), "after:Python".to_string()]
  );
}

#[tokio::test]
#[serial]
async fn test_each_queue_has_its_own_store() {
  setup_tracing();
  let first = StagesQueue::<TestError>::new([recording_step("a")]);
  let second = StagesQueue::<TestError>::new([recording_step("b")]);
  first.set_storages(ContextPatch::new().set(COUNT, 7));

  assert_eq!(first.get_storage(COUNT, 0), 7);
  assert_eq!(second.get_storage(COUNT, 0), 0);
}

#[test]
fn test_reading_with_a_default_does_not_store_it() {
  setup_tracing();
  let store = ContextStore::new();
  assert_eq!(store.get(COUNT, 3), 3);
  assert_eq!(store.get(COUNT, 5), 5);
  assert!(!store.contains(COUNT.name()));
}

#[test]
fn test_null_write_resets_reads_to_the_default() {
  setup_tracing();
  let store = ContextStore::new();
  store.set_many(ContextPatch::new().set(NAME, "Rust".to_string()));
  store.set_many(ContextPatch::new().set_opt(NAME, None));
  assert_eq!(store.get(NAME, "fallback".to_string()), "fallback");
  assert!(store.try_get(NAME).is_none());
}

#[test]
fn test_batch_read_only_returns_present_keys() {
  setup_tracing();
  let store = ContextStore::new();
  store.set_many(ContextPatch::new().set(NAME, "Go".to_string()).set(COUNT, 1));

  let snapshot = store.get_many([NAME.name(), SEEN.name()]);
  assert_eq!(snapshot.len(), 1);
  assert_eq!(snapshot.get(NAME).as_deref(), Some("Go"));
  assert!(snapshot.get(SEEN).is_none());
}

#[test]
fn test_store_clones_share_state() {
  setup_tracing();
  let store = ContextStore::new();
  let handle = store.clone();
  handle.set_many(ContextPatch::new().set(COUNT, 9));
  assert_eq!(store.get(COUNT, 0), 9);
}
