// templar/src/commands/edit.rs

//! `edit`: changes the extensions of a template. When the workspace currently
//! applies that template, it is applied again with a restart reminder.

use crate::actions::keys::TEMPLATE_ID;
use crate::actions::{edit_one, select_extensions, select_templates};
use crate::commands::{apply, with_handler, Command, CommandArgs, Services};
use crate::core::context::ContextPatch;
use crate::core::stage::Stage;
use crate::core::step::StepSlot;
use crate::error::{TemplarError, TemplarResult};
use crate::queue::StagesQueue;
use crate::ui::MessageLevel;
use std::sync::Arc;
use tracing::{event, Level};

pub const ACTION: &str = "edit";

pub const RESTART_MESSAGE: &str = "✅ Edit template successfully. 🔄 This workspace is applying this template, please restart VS Code to take effects.";

pub fn command(services: &Services) -> Command {
  with_handler(Command::new(&services.prefix, ACTION), services, on_edit)
}

async fn on_edit(command: Command, services: Services, args: CommandArgs) -> TemplarResult<()> {
  let select = select_templates(
    &command,
    Arc::clone(&services.window),
    Arc::clone(&services.templates),
    false,
  );
  let extensions = select_extensions(
    &command,
    Arc::clone(&services.window),
    Arc::clone(&services.templates),
    Arc::clone(&services.catalog),
    true,
  );
  let template_id = args.given_template_id().cloned();

  let queue = StagesQueue::new([
    select.slot_unless(template_id.is_some()),
    extensions.slot(),
    edit_one(&command, Arc::clone(&services.window), Arc::clone(&services.templates)),
    restart_if_applied(services),
  ]);
  queue.set_storages(ContextPatch::new().set_opt(TEMPLATE_ID, template_id));

  let result = queue.exec().await;
  select.lease.cleanup().await;
  extensions.lease.cleanup().await;
  result.map(|_| ())
}

fn restart_if_applied(services: Services) -> StepSlot<TemplarError> {
  StepSlot::new(move |stage: Stage| {
    let services = services.clone();
    async move {
      let edited_id = stage.manager().get_storage(TEMPLATE_ID, String::new());
      let applied_id = services.workspace.applied_template_id();

      if applied_id.as_deref() != Some(edited_id.as_str()) {
        services
          .window
          .notify(MessageLevel::Info, "✅ Edit template successfully.");
        return Ok::<_, TemplarError>(stage.next_code());
      }

      let args = CommandArgs::none()
        .with_template_id(edited_id)
        .with_message(RESTART_MESSAGE);
      match services.chain(apply::ACTION, args).await {
        Ok(()) => Ok(stage.next_code()),
        Err(e) => {
          event!(Level::ERROR, error = %e, "Re-applying the edited template failed.");
          Ok(stage.exit_code())
        }
      }
    }
  })
}
