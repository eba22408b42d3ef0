// templar/src/queue/execution.rs

//! Contains the `StagesQueue::exec()` run loop.

use crate::core::context::ContextStore;
use crate::core::control::{Transition, EXIT_CODE};
use crate::queue::definition::StagesQueue;
use tracing::{event, instrument, span, Instrument, Level};

impl<Err> StagesQueue<Err>
where
  Err: std::error::Error + Send + Sync + 'static,
{
  /// Runs the wizard until a step leaves the range of stages.
  ///
  /// Each step's answer becomes the next position; `None` counts as exit. The
  /// loop ends as soon as the position falls outside `[0, len)`, which covers
  /// `EXIT_CODE` and also a step overshooting the last stage (treated as
  /// completion). An empty queue returns immediately without running anything.
  ///
  /// Step errors are not caught: they end the run and are returned as-is.
  /// On completion the run's context store is handed back so the caller can
  /// tell success from cancellation by what the steps wrote.
  #[instrument(
    name = "StagesQueue::exec",
    skip_all,
    fields(
      queue_error_type = %std::any::type_name::<Err>(),
      num_stages = self.stages.len(),
    ),
    err(Display)
  )]
  pub async fn exec(self) -> Result<ContextStore, Err> {
    event!(Level::DEBUG, "Queue execution starting.");
    self.manager.reset();

    let mut iterations: usize = 0;
    loop {
      let position = self.manager.current_position();
      if !self.manager.is_running_position(position) {
        break;
      }
      let Some(queued) = usize::try_from(position).ok().and_then(|p| self.stages.get(p)) else {
        break;
      };

      let stage_span = span!(
        Level::DEBUG,
        "stage_execution",
        stage_code = position,
        has_change_stage = self.manager.has_change_stage(),
        iteration = iterations
      );

      let next = match queued.execute().instrument(stage_span).await {
        Ok(next) => next.unwrap_or(EXIT_CODE),
        Err(e) => {
          event!(Level::ERROR, error = %e, stage_code = position, "Step failed; aborting the run.");
          return Err(e);
        }
      };

      let transition = Transition::classify(position, next);
      if transition.is_conventional() {
        event!(Level::DEBUG, stage_code = position, next_code = next, ?transition, "Stage finished.");
      } else {
        event!(
          Level::WARN,
          stage_code = position,
          next_code = next,
          "Step answered a code that is not exit/previous/current/next."
        );
      }

      self.manager.record_transition(position, next);
      iterations += 1;
    }

    event!(Level::DEBUG, iterations, "Queue execution finished.");
    Ok(self.manager.storage().clone())
  }
}
