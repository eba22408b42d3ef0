// templar/src/core/stage.rs

//! `Stage` is the handle a step receives when it runs: its own position in the
//! queue plus access to the queue's shared state (`QueueManager`).

use crate::core::context::{ContextKey, ContextPatch, ContextSnapshot, ContextStore};
use crate::core::control::{StageCode, EXIT_CODE};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
  current: StageCode,
  previous: StageCode,
}

impl Cursor {
  const START: Cursor = Cursor {
    current: 0,
    previous: EXIT_CODE,
  };
}

/// State shared by every stage of one queue: the context store and the
/// position bookkeeping steps consult to adapt their behavior.
pub struct QueueManager {
  storage: ContextStore,
  cursor: RwLock<Cursor>,
  len: usize,
}

impl QueueManager {
  pub(crate) fn new(len: usize) -> Self {
    Self {
      storage: ContextStore::new(),
      cursor: RwLock::new(Cursor::START),
      len,
    }
  }

  pub fn storage(&self) -> &ContextStore {
    &self.storage
  }

  pub fn set_storages(&self, patch: ContextPatch) {
    self.storage.set_many(patch);
  }

  pub fn get_storage<T: Clone + Send + Sync + 'static>(&self, key: ContextKey<T>, default: T) -> T {
    self.storage.get(key, default)
  }

  pub fn get_storages<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> ContextSnapshot {
    self.storage.get_many(names)
  }

  /// True iff the stage about to run (or running) is the first one. Steps use
  /// this to drop the "back" button, since there is nowhere to go back to.
  pub fn is_in_first_stage(&self) -> bool {
    self.cursor.read().current == 0
  }

  /// True iff the position changed on the transition into the running stage.
  /// False only when a stage is re-run after returning its own code.
  pub fn has_change_stage(&self) -> bool {
    let cursor = self.cursor.read();
    cursor.current != cursor.previous
  }

  pub fn current_position(&self) -> StageCode {
    self.cursor.read().current
  }

  pub fn previous_position(&self) -> StageCode {
    self.cursor.read().previous
  }

  /// Number of real (non-skipped) stages in the queue.
  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  pub(crate) fn is_running_position(&self, position: StageCode) -> bool {
    usize::try_from(position).is_ok_and(|p| p < self.len)
  }

  pub(crate) fn reset(&self) {
    *self.cursor.write() = Cursor::START;
  }

  /// Records the transition `executed -> next`. The executed position becomes
  /// `previous` only after the step finished, so the comparison seen by the
  /// next stage reflects the transition that just happened.
  pub(crate) fn record_transition(&self, executed: StageCode, next: StageCode) {
    let mut cursor = self.cursor.write();
    cursor.current = next;
    cursor.previous = executed;
  }
}

impl fmt::Debug for QueueManager {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("QueueManager")
      .field("len", &self.len)
      .field("cursor", &*self.cursor.read())
      .field("storage", &self.storage)
      .finish()
  }
}

/// One scheduled step, seen from inside the step.
#[derive(Clone)]
pub struct Stage {
  code: StageCode,
  manager: Arc<QueueManager>,
}

impl Stage {
  pub(crate) fn new(code: StageCode, manager: Arc<QueueManager>) -> Self {
    Self { code, manager }
  }

  pub fn exit_code(&self) -> StageCode {
    EXIT_CODE
  }

  pub fn current_code(&self) -> StageCode {
    self.code
  }

  pub fn next_code(&self) -> StageCode {
    self.code + 1
  }

  pub fn prev_code(&self) -> StageCode {
    self.code - 1
  }

  pub fn manager(&self) -> &QueueManager {
    &self.manager
  }
}

impl fmt::Debug for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Stage").field("code", &self.code).finish()
  }
}
