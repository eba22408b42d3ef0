// templar/src/core/step.rs

//! The step contract: an asynchronous unit of work bound to one stage, which
//! answers with the code of the stage to run next.

use crate::core::control::StageCode;
use crate::core::stage::Stage;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Future returned by a step. `Ok(None)` means "exit".
pub type StepFuture<Err> = Pin<Box<dyn Future<Output = Result<Option<StageCode>, Err>> + Send>>;

/// Type alias for a step function.
///
/// A step receives its `Stage` (which carries its code and the queue's shared
/// state) and resolves to one of `stage.exit_code()`, `stage.prev_code()`,
/// `stage.current_code()` or `stage.next_code()`.
///
/// Steps are `Fn`, not `FnOnce`: back-navigation and retries re-enter them.
/// A step must catch its own recoverable failures and answer `exit_code()` or
/// `current_code()`; returning `Err` is reserved for programmer errors and ends
/// the run.
pub type StepFn<Err> = Arc<dyn Fn(Stage) -> StepFuture<Err> + Send + Sync>;

/// One entry of the list a `StagesQueue` is built from.
pub enum StepSlot<Err> {
  Step(StepFn<Err>),
  /// Stand-in for a step the caller chose to omit. Dropped before indexing, so
  /// it never occupies a position.
  Skipped,
}

/// Wraps an async closure as a `StepFn`. The closure may return any error type
/// convertible into the queue's error type, and either a bare `StageCode` or an
/// `Option<StageCode>`.
pub fn step_fn<Err, F, Fut, R, UserErr>(step: F) -> StepFn<Err>
where
  Err: Send + 'static,
  F: Fn(Stage) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = Result<R, UserErr>> + Send + 'static,
  R: Into<Option<StageCode>>,
  UserErr: Into<Err>,
{
  Arc::new(move |stage: Stage| -> StepFuture<Err> {
    let user_fut = step(stage);
    Box::pin(async move { user_fut.await.map(Into::into).map_err(Into::into) })
  })
}

impl<Err: Send + 'static> StepSlot<Err> {
  /// Wraps an async closure as a step; see `step_fn`.
  pub fn new<F, Fut, R, UserErr>(step: F) -> Self
  where
    F: Fn(Stage) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, UserErr>> + Send + 'static,
    R: Into<Option<StageCode>>,
    UserErr: Into<Err>,
  {
    StepSlot::Step(step_fn(step))
  }
}

impl<Err> StepSlot<Err> {
  pub fn skipped() -> Self {
    StepSlot::Skipped
  }

  /// `Skipped` when `skip` holds, otherwise `slot`.
  pub fn unless(skip: bool, slot: StepSlot<Err>) -> Self {
    if skip {
      StepSlot::Skipped
    } else {
      slot
    }
  }

  pub fn is_skipped(&self) -> bool {
    matches!(self, StepSlot::Skipped)
  }

  pub(crate) fn into_step(self) -> Option<StepFn<Err>> {
    match self {
      StepSlot::Step(step_fn) => Some(step_fn),
      StepSlot::Skipped => None,
    }
  }
}

// Slots are shared between chained runs of one command invocation.
impl<Err> Clone for StepSlot<Err> {
  fn clone(&self) -> Self {
    match self {
      StepSlot::Step(step_fn) => StepSlot::Step(Arc::clone(step_fn)),
      StepSlot::Skipped => StepSlot::Skipped,
    }
  }
}

impl<Err> fmt::Debug for StepSlot<Err> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      StepSlot::Step(_) => f.write_str("StepSlot::Step(..)"),
      StepSlot::Skipped => f.write_str("StepSlot::Skipped"),
    }
  }
}
