// templar/src/commands/create.rs

//! `create`: names a new template, picks its extensions (starting from the
//! global template's), saves it and offers to apply it.

use crate::actions::keys::{APPLY_GLOBAL_TEMPLATE, TEMPLATE_ID};
use crate::actions::{name_template, save_one, select_extensions, NameTemplateOptions};
use crate::commands::{apply, with_handler, Command, CommandArgs, Services};
use crate::core::context::ContextPatch;
use crate::core::stage::Stage;
use crate::core::step::StepSlot;
use crate::error::{TemplarError, TemplarResult};
use crate::queue::StagesQueue;
use crate::templates::types::TemplateId;
use crate::ui::MessageLevel;
use std::sync::Arc;
use tracing::{event, Level};
use uuid::Uuid;

pub const ACTION: &str = "create";

pub fn command(services: &Services) -> Command {
  with_handler(Command::new(&services.prefix, ACTION), services, on_create)
}

async fn on_create(command: Command, services: Services, _args: CommandArgs) -> TemplarResult<()> {
  let template_id = Uuid::new_v4().to_string();

  let name = name_template(
    Arc::clone(&services.window),
    Arc::clone(&services.templates),
    NameTemplateOptions::new("Name your template", "your template name"),
  );
  let select = select_extensions(
    &command,
    Arc::clone(&services.window),
    Arc::clone(&services.templates),
    Arc::clone(&services.catalog),
    true,
  );

  let queue = StagesQueue::new([
    name.slot(),
    select.slot(),
    save_one(&command, Arc::clone(&services.window), Arc::clone(&services.templates)),
    ask_apply(services, template_id.clone()),
  ]);
  queue.set_storages(
    ContextPatch::new()
      .set(TEMPLATE_ID, template_id)
      .set(APPLY_GLOBAL_TEMPLATE, true),
  );

  let result = queue.exec().await;
  name.lease.cleanup().await;
  select.lease.cleanup().await;
  result.map(|_| ())
}

fn ask_apply(services: Services, template_id: TemplateId) -> StepSlot<TemplarError> {
  StepSlot::new(move |stage: Stage| {
    let services = services.clone();
    let template_id = template_id.clone();
    async move {
      let action = services
        .window
        .ask(
          MessageLevel::Info,
          "✅ Create template successfully. 🧬 Do you want to apply this template ?",
          &["Apply", "Dismiss"],
        )
        .await;
      if action.as_deref() != Some("Apply") {
        return Ok::<_, TemplarError>(stage.exit_code());
      }

      match services
        .chain(apply::ACTION, CommandArgs::none().with_template_id(template_id))
        .await
      {
        Ok(()) => Ok(stage.next_code()),
        Err(e) => {
          event!(Level::ERROR, error = %e, "Applying the new template failed.");
          Ok(stage.exit_code())
        }
      }
    }
  })
}
