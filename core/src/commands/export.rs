// templar/src/commands/export.rs

//! `export`: writes the selected templates to a JSON file.

use crate::actions::keys::{SELECTED_PATH, TEMPLATE_IDS};
use crate::actions::select_templates;
use crate::commands::{with_handler, Command, CommandArgs, Services};
use crate::core::context::ContextPatch;
use crate::core::stage::Stage;
use crate::core::step::StepSlot;
use crate::error::{TemplarError, TemplarResult};
use crate::queue::StagesQueue;
use crate::templates::store::TemplateStore;
use crate::templates::types::{ExportedData, TemplateIds};
use crate::ui::{FileDialogOptions, MessageLevel, Window};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{event, Level};

pub const ACTION: &str = "export";

pub const DEFAULT_FILE_NAME: &str = "exported-data.json";

pub fn command(services: &Services) -> Command {
  with_handler(Command::new(&services.prefix, ACTION), services, on_export)
}

async fn on_export(command: Command, services: Services, _args: CommandArgs) -> TemplarResult<()> {
  let select = select_templates(
    &command,
    Arc::clone(&services.window),
    Arc::clone(&services.templates),
    true,
  );

  let queue = StagesQueue::new([
    select.slot(),
    select_path(Arc::clone(&services.window)),
    save_file(Arc::clone(&services.window), Arc::clone(&services.templates)),
  ]);

  let result = queue.exec().await;
  select.lease.cleanup().await;
  result.map(|_| ())
}

/// Asks where to export. Cancelling goes back to the template selection.
fn select_path(window: Arc<dyn Window>) -> StepSlot<TemplarError> {
  StepSlot::new(move |stage: Stage| {
    let window = Arc::clone(&window);
    async move {
      let options = FileDialogOptions::json("Export template(s)", "Export").with_default_path(DEFAULT_FILE_NAME);
      let Some(path) = window.show_save_dialog(options).await else {
        return Ok::<_, TemplarError>(stage.prev_code());
      };
      stage.manager().set_storages(ContextPatch::new().set(SELECTED_PATH, path));
      Ok(stage.next_code())
    }
  })
}

/// Writes the export file. Always the last stage: it ends the run whether the
/// write succeeded or not.
fn save_file(window: Arc<dyn Window>, store: Arc<dyn TemplateStore>) -> StepSlot<TemplarError> {
  StepSlot::new(move |stage: Stage| {
    let window = Arc::clone(&window);
    let store = Arc::clone(&store);
    async move {
      let manager = stage.manager();
      let template_ids = manager.get_storage(TEMPLATE_IDS, TemplateIds::new());
      let selected_path = manager.get_storage(SELECTED_PATH, PathBuf::new());

      if template_ids.is_empty() {
        window.notify(MessageLevel::Error, "✏ Please select at least one item.");
        return Ok::<_, TemplarError>(stage.exit_code());
      }
      if selected_path.as_os_str().is_empty() {
        window.notify(MessageLevel::Error, "✏ Please select a path to export.");
        return Ok(stage.exit_code());
      }

      let exported = ExportedData {
        templates: template_ids
          .iter()
          .map(|id| (id.clone(), store.get_template_value(id)))
          .collect(),
      };

      match write_export(&selected_path, &exported).await {
        Ok(()) => {
          event!(Level::INFO, path = %selected_path.display(), count = exported.templates.len(), "Templates exported.");
          window.notify(MessageLevel::Info, "✅ Export templates successfully.");
        }
        Err(e) => {
          event!(Level::ERROR, error = %e, path = %selected_path.display(), "Exporting templates failed.");
          window.notify(MessageLevel::Error, "🚫 Export templates failed.");
        }
      }
      Ok(stage.exit_code())
    }
  })
}

async fn write_export(path: &std::path::Path, exported: &ExportedData) -> TemplarResult<()> {
  let text = serde_json::to_string_pretty(exported)?;
  tokio::fs::write(path, text).await?;
  Ok(())
}
