// templar/src/commands/import.rs

//! `import`: replaces every stored template with the ones of a JSON file.

use crate::actions::keys::{SELECTED_FILE, TEMPLATES};
use crate::actions::save_many;
use crate::commands::{with_handler, Command, CommandArgs, Services};
use crate::core::context::ContextPatch;
use crate::core::stage::Stage;
use crate::core::step::StepSlot;
use crate::error::{TemplarError, TemplarResult};
use crate::queue::StagesQueue;
use crate::templates::types::ExportedData;
use crate::templates::validate::validate_exported_data;
use crate::ui::{FileDialogOptions, MessageLevel, Window};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{event, Level};

pub const ACTION: &str = "import";

pub fn command(services: &Services) -> Command {
  with_handler(Command::new(&services.prefix, ACTION), services, on_import)
}

async fn on_import(command: Command, services: Services, _args: CommandArgs) -> TemplarResult<()> {
  let queue = StagesQueue::new([
    select_file(Arc::clone(&services.window)),
    load_data(Arc::clone(&services.window)),
    save_many(&command, Arc::clone(&services.window), Arc::clone(&services.templates)),
  ]);
  queue.exec().await.map(|_| ())
}

fn select_file(window: Arc<dyn Window>) -> StepSlot<TemplarError> {
  StepSlot::new(move |stage: Stage| {
    let window = Arc::clone(&window);
    async move {
      let Some(path) = window
        .show_open_dialog(FileDialogOptions::json("Select a file", "Import"))
        .await
      else {
        return Ok::<_, TemplarError>(stage.exit_code());
      };
      stage.manager().set_storages(ContextPatch::new().set(SELECTED_FILE, path));
      Ok(stage.next_code())
    }
  })
}

/// Reads and validates the selected file, leaving its templates in
/// `templates`.
fn load_data(window: Arc<dyn Window>) -> StepSlot<TemplarError> {
  StepSlot::new(move |stage: Stage| {
    let window = Arc::clone(&window);
    async move {
      let selected_file = stage.manager().get_storage(SELECTED_FILE, PathBuf::new());
      if selected_file.as_os_str().is_empty() {
        window.notify(MessageLevel::Warning, "⚠ Please select a file to import.");
        return Ok::<_, TemplarError>(stage.exit_code());
      }

      match read_exported_data(&selected_file).await {
        Ok(exported) => {
          stage
            .manager()
            .set_storages(ContextPatch::new().set(TEMPLATES, exported.templates));
          Ok(stage.next_code())
        }
        Err(e) => {
          event!(Level::ERROR, error = %e, path = %selected_file.display(), "Import file rejected.");
          window.notify(MessageLevel::Error, "⛔ Malformed data.");
          Ok(stage.exit_code())
        }
      }
    }
  })
}

async fn read_exported_data(path: &Path) -> TemplarResult<ExportedData> {
  let text = tokio::fs::read_to_string(path).await?;
  let value: serde_json::Value = serde_json::from_str(&text)?;
  validate_exported_data(&value)
}
