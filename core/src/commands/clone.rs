// templar/src/commands/clone.rs

//! `clone`: copies an existing template under a new id and a new name.

use crate::actions::keys::{TEMPLATE_EXTENSIONS, TEMPLATE_ID, TEMPLATE_NAME};
use crate::actions::{name_template, save_one, select_templates, Materials, NameTemplateOptions};
use crate::commands::{edit, with_handler, Command, CommandArgs, Services};
use crate::core::context::ContextPatch;
use crate::core::stage::Stage;
use crate::core::step::StepSlot;
use crate::error::{TemplarError, TemplarResult};
use crate::queue::StagesQueue;
use crate::templates::store::TemplateStore;
use crate::templates::types::TemplateId;
use crate::ui::MessageLevel;
use std::sync::Arc;
use tracing::{event, Level};
use uuid::Uuid;

pub const ACTION: &str = "clone";

pub fn command(services: &Services) -> Command {
  with_handler(Command::new(&services.prefix, ACTION), services, on_clone)
}

async fn on_clone(command: Command, services: Services, _args: CommandArgs) -> TemplarResult<()> {
  let template_id = Uuid::new_v4().to_string();

  let select = select_templates(
    &command,
    Arc::clone(&services.window),
    Arc::clone(&services.templates),
    false,
  );
  let name = name_template(
    Arc::clone(&services.window),
    Arc::clone(&services.templates),
    NameTemplateOptions::new("Name your template", "your template name"),
  );

  let queue = StagesQueue::new([
    select_source(&select, Arc::clone(&services.templates), template_id.clone()),
    name.slot(),
    save_one(&command, Arc::clone(&services.window), Arc::clone(&services.templates)),
    ask_edit(services, template_id),
  ]);

  let result = queue.exec().await;
  select.lease.cleanup().await;
  name.lease.cleanup().await;
  result.map(|_| ())
}

/// Template selection that, once a source is chosen, seeds the copy: the
/// source's extensions, its name suffixed with " - copy", and the new id.
fn select_source(
  select: &Materials,
  store: Arc<dyn TemplateStore>,
  template_id: TemplateId,
) -> StepSlot<TemplarError> {
  let select_templates = Arc::clone(&select.step);
  StepSlot::new(move |stage: Stage| {
    let select_templates = Arc::clone(&select_templates);
    let store = Arc::clone(&store);
    let template_id = template_id.clone();
    async move {
      let next = select_templates(stage.clone()).await?;
      if next == Some(stage.next_code()) {
        let manager = stage.manager();
        let source_id = manager.get_storage(TEMPLATE_ID, String::new());
        let source = store.get_template_value(&source_id);
        manager.set_storages(
          ContextPatch::new()
            .set(TEMPLATE_NAME, format!("{} - copy", source.name))
            .set(TEMPLATE_EXTENSIONS, source.extensions)
            .set(TEMPLATE_ID, template_id),
        );
      }
      Ok::<_, TemplarError>(next)
    }
  })
}

fn ask_edit(services: Services, template_id: TemplateId) -> StepSlot<TemplarError> {
  StepSlot::new(move |stage: Stage| {
    let services = services.clone();
    let template_id = template_id.clone();
    async move {
      let action = services
        .window
        .ask(
          MessageLevel::Info,
          "✅ Clone template successfully. 📝 Do you want to edit this template ?",
          &["Edit", "Dismiss"],
        )
        .await;
      if action.as_deref() != Some("Edit") {
        return Ok::<_, TemplarError>(stage.next_code());
      }

      match services
        .chain(edit::ACTION, CommandArgs::none().with_template_id(template_id))
        .await
      {
        Ok(()) => Ok(stage.next_code()),
        Err(e) => {
          event!(Level::ERROR, error = %e, "Editing the cloned template failed.");
          Ok(stage.exit_code())
        }
      }
    }
  })
}
