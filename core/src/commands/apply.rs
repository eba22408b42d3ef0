// templar/src/commands/apply.rs

//! `apply`: enables a template's extensions (plus the global ones) in the
//! current workspace and disables every other installed extension.

use crate::actions::keys::TEMPLATE_ID;
use crate::actions::select_templates;
use crate::commands::{with_handler, Command, CommandArgs, Services};
use crate::core::context::ContextPatch;
use crate::core::stage::Stage;
use crate::core::step::StepSlot;
use crate::error::{TemplarError, TemplarResult};
use crate::queue::StagesQueue;
use crate::templates::workspace::ApplyTemplate;
use crate::ui::MessageLevel;
use std::sync::Arc;
use tracing::{event, Level};

pub const ACTION: &str = "apply";

pub const DEFAULT_MESSAGE: &str = "✅ Apply template successfully. 🔄 Please restart VS Code.";

pub fn command(services: &Services) -> Command {
  with_handler(Command::new(&services.prefix, ACTION), services, on_apply)
}

async fn on_apply(command: Command, services: Services, args: CommandArgs) -> TemplarResult<()> {
  let select = select_templates(
    &command,
    Arc::clone(&services.window),
    Arc::clone(&services.templates),
    false,
  );
  let template_id = args.given_template_id().cloned();
  let message = args.message.unwrap_or_else(|| DEFAULT_MESSAGE.to_string());

  let queue = StagesQueue::new([
    select.slot_unless(template_id.is_some()),
    apply_template(services, message),
  ]);
  queue.set_storages(ContextPatch::new().set_opt(TEMPLATE_ID, template_id));

  let result = queue.exec().await;
  select.lease.cleanup().await;
  result.map(|_| ())
}

/// Writes the split of `templateId` to the workspace and notifies `message`.
pub fn apply_template(services: Services, message: String) -> StepSlot<TemplarError> {
  StepSlot::new(move |stage: Stage| {
    let services = services.clone();
    let message = message.clone();
    async move {
      let template_id = stage.manager().get_storage(TEMPLATE_ID, String::new());
      if template_id.is_empty() {
        services
          .window
          .notify(MessageLevel::Error, "⛔ Template id must be not empty.");
        return Ok::<_, TemplarError>(stage.exit_code());
      }

      let installed = services.catalog.installed_extensions().await;
      let split = services.templates.split_extensions(&template_id, &installed);
      let apply = ApplyTemplate {
        template_id: template_id.clone(),
        enabled: split.enabled,
        disabled: split.disabled,
      };

      if let Err(e) = services.workspace.apply_template(apply).await {
        event!(Level::ERROR, error = %e, template_id = %template_id, "Applying template failed.");
        services
          .window
          .notify(MessageLevel::Error, &format!("🚫 Can not apply template.\nReason: {e}"));
        return Ok(stage.exit_code());
      }

      event!(Level::INFO, template_id = %template_id, "Template applied to the workspace.");
      services.window.notify(MessageLevel::Info, &message);
      Ok(stage.next_code())
    }
  })
}
