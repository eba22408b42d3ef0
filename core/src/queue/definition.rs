// templar/src/queue/definition.rs

//! Contains the `StagesQueue<Err>` struct definition and the methods steps and
//! callers use before and during a run.

use crate::core::context::{ContextKey, ContextPatch, ContextSnapshot, ContextStore};
use crate::core::control::StageCode;
use crate::core::stage::{QueueManager, Stage};
use crate::core::step::{StepFn, StepFuture, StepSlot};
use std::fmt;
use std::sync::Arc;

/// A step bound to its position.
pub(crate) struct QueuedStage<Err> {
  pub(crate) stage: Stage,
  executer: StepFn<Err>,
}

impl<Err> QueuedStage<Err> {
  pub(crate) fn execute(&self) -> StepFuture<Err> {
    (self.executer)(self.stage.clone())
  }
}

/// One run of a wizard: an ordered, compacted list of stages sharing one
/// context store.
///
/// The step list is fixed at construction. `exec` consumes the queue, so a new
/// run always means a new queue (and a fresh context store).
pub struct StagesQueue<Err>
where
  Err: std::error::Error + Send + Sync + 'static,
{
  pub(crate) manager: Arc<QueueManager>,
  pub(crate) stages: Vec<QueuedStage<Err>>,
}

impl<Err> StagesQueue<Err>
where
  Err: std::error::Error + Send + Sync + 'static,
{
  /// Builds the queue, dropping `Skipped` slots first. Codes are assigned by
  /// position among the surviving steps, so gaps left by skipped steps close up.
  pub fn new(slots: impl IntoIterator<Item = StepSlot<Err>>) -> Self {
    let executers: Vec<StepFn<Err>> = slots.into_iter().filter_map(StepSlot::into_step).collect();
    let manager = Arc::new(QueueManager::new(executers.len()));

    let stages = executers
      .into_iter()
      .zip(0..)
      .map(|(executer, code)| QueuedStage {
        stage: Stage::new(code, Arc::clone(&manager)),
        executer,
      })
      .collect();

    Self { manager, stages }
  }

  pub fn set_storages(&self, patch: ContextPatch) {
    self.manager.set_storages(patch);
  }

  pub fn get_storage<T: Clone + Send + Sync + 'static>(&self, key: ContextKey<T>, default: T) -> T {
    self.manager.get_storage(key, default)
  }

  pub fn get_storages<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> ContextSnapshot {
    self.manager.get_storages(names)
  }

  /// Handle to this run's context store. Clone it before `exec` to inspect
  /// what the steps wrote after the run.
  pub fn storage(&self) -> &ContextStore {
    self.manager.storage()
  }

  pub fn manager(&self) -> &QueueManager {
    &self.manager
  }

  pub fn is_in_first_stage(&self) -> bool {
    self.manager.is_in_first_stage()
  }

  pub fn has_change_stage(&self) -> bool {
    self.manager.has_change_stage()
  }

  pub fn len(&self) -> usize {
    self.stages.len()
  }

  pub fn is_empty(&self) -> bool {
    self.stages.is_empty()
  }

  pub fn stage_codes(&self) -> Vec<StageCode> {
    self.stages.iter().map(|queued| queued.stage.current_code()).collect()
  }
}

impl<Err> fmt::Debug for StagesQueue<Err>
where
  Err: std::error::Error + Send + Sync + 'static,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("StagesQueue")
      .field("stages", &self.stages.len())
      .field("manager", &self.manager)
      .finish()
  }
}
