// templar/src/commands/delete.rs

use crate::actions::keys::{ReassignPolicy, NEED_REASSIGN};
use crate::actions::{delete_many, select_templates};
use crate::commands::{with_handler, Command, CommandArgs, Services};
use crate::core::context::ContextPatch;
use crate::core::stage::Stage;
use crate::core::step::StepSlot;
use crate::error::{TemplarError, TemplarResult};
use crate::queue::StagesQueue;
use crate::ui::{MessageLevel, Window};
use std::sync::Arc;

pub const ACTION: &str = "delete";

pub const CONFIRM_YES: &str = "Yes";
pub const CONFIRM_NO: &str = "No";
pub const CONFIRM_BACK: &str = "Back to select templates";

pub fn command(services: &Services) -> Command {
  with_handler(Command::new(&services.prefix, ACTION), services, on_delete)
}

async fn on_delete(command: Command, services: Services, _args: CommandArgs) -> TemplarResult<()> {
  let select = select_templates(
    &command,
    Arc::clone(&services.window),
    Arc::clone(&services.templates),
    true,
  );

  let queue = StagesQueue::new([
    select.slot(),
    confirm_delete(Arc::clone(&services.window)),
    delete_many(&command, Arc::clone(&services.window), Arc::clone(&services.templates)),
  ]);
  // Coming back from the confirmation keeps the current selection.
  let keep_selection: ReassignPolicy = Arc::new(|has_change_stage: bool| !has_change_stage);
  queue.set_storages(ContextPatch::new().set(NEED_REASSIGN, keep_selection));

  let result = queue.exec().await;
  select.lease.cleanup().await;
  result.map(|_| ())
}

fn confirm_delete(window: Arc<dyn Window>) -> StepSlot<TemplarError> {
  StepSlot::new(move |stage: Stage| {
    let window = Arc::clone(&window);
    async move {
      let answer = window
        .ask(
          MessageLevel::Info,
          "❌ Do you really want to delete ?",
          &[CONFIRM_YES, CONFIRM_NO, CONFIRM_BACK],
        )
        .await;
      let next = match answer.as_deref() {
        Some(CONFIRM_YES) => stage.next_code(),
        Some(CONFIRM_BACK) => stage.prev_code(),
        _ => stage.exit_code(),
      };
      Ok::<_, TemplarError>(next)
    }
  })
}
