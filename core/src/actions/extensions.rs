// templar/src/actions/extensions.rs

use crate::actions::keys::{APPLY_GLOBAL_TEMPLATE, TEMPLATE_EXTENSIONS, TEMPLATE_ID};
use crate::actions::Materials;
use crate::commands::Command;
use crate::core::context::ContextPatch;
use crate::core::stage::Stage;
use crate::core::step::{step_fn, StepFn};
use crate::error::TemplarError;
use crate::templates::catalog::ExtensionCatalog;
use crate::templates::store::TemplateStore;
use crate::templates::types::{Extension, GLOBAL_TEMPLATE_ID};
use crate::ui::{Button, MessageLevel, PickItem, Picker, QuickPickEvent, QuickPickOptions, WidgetLease, Window};
use std::sync::Arc;
use tracing::{event, Level};

/// Lets the user choose the extensions of `templateId` among the installed
/// ones, writing them to `templateExtensions`.
///
/// The item list is rebuilt only when the stage was entered anew, so a retry
/// keeps the user's current selection. Items start picked when they belong to
/// the template, or to the global template when `applyGlobalTemplate` is set.
/// With `required`, at least one extension must be selected.
pub fn select_extensions(
  command: &Command,
  window: Arc<dyn Window>,
  store: Arc<dyn TemplateStore>,
  catalog: Arc<dyn ExtensionCatalog>,
  required: bool,
) -> Materials {
  let picker = Picker::new(
    Arc::clone(&window),
    QuickPickOptions {
      title: "Select all the extensions you want to enable".to_string(),
      can_select_many: true,
      ignore_focus_out: true,
    },
    required,
  )
  .shared();
  let lease = WidgetLease::new(Arc::clone(&picker));
  let action_name = command.action_name().to_string();

  let step: StepFn<TemplarError> = step_fn(move |stage: Stage| {
    let picker = Arc::clone(&picker);
    let window = Arc::clone(&window);
    let store = Arc::clone(&store);
    let catalog = Arc::clone(&catalog);
    let action_name = action_name.clone();
    async move {
      let manager = stage.manager();
      let mut picker = picker.lock().await;

      if manager.is_in_first_stage() {
        picker.set_buttons(vec![Button::Close]);
      } else {
        picker.set_buttons(vec![Button::Back, Button::Close]);
      }

      let template_id = manager.get_storage(TEMPLATE_ID, String::new());
      if template_id.is_empty() {
        window.notify(MessageLevel::Error, "⛔ Template id must be not empty.");
        return Ok::<_, TemplarError>(stage.exit_code());
      }

      if manager.has_change_stage() {
        let apply_global_template = manager.get_storage(APPLY_GLOBAL_TEMPLATE, false);
        let enabled_ids = store.get_extension_ids(&template_id);
        let global_ids = store.get_extension_ids(GLOBAL_TEMPLATE_ID);

        let items: Vec<PickItem> = catalog
          .installed_manifests(true)
          .await
          .iter()
          .map(|manifest| {
            let id = manifest.extension_id();
            let picked = if apply_global_template {
              global_ids.contains(&id)
            } else {
              enabled_ids.contains(&id)
            };
            PickItem::from_manifest(manifest, picked, vec![Button::Information])
          })
          .collect();
        let picked_items = items.iter().filter(|item| item.picked).cloned().collect();

        event!(Level::DEBUG, items = items.len(), template_id = %template_id, "Extension items rebuilt.");
        picker.set_items(items);
        picker.set_selected_items(picked_items);
      }

      if picker.items().is_empty() {
        window.notify(MessageLevel::Info, &format!("⭕ No extensions to {action_name}."));
        return Ok(stage.exit_code());
      }

      picker.show();

      loop {
        match picker.next_event().await {
          QuickPickEvent::Hide => return Ok(stage.exit_code()),
          QuickPickEvent::TriggerButton(Button::Back) => return Ok(stage.prev_code()),
          QuickPickEvent::TriggerButton(_) => return Ok(stage.exit_code()),
          QuickPickEvent::TriggerItemButton {
            item,
            button: Button::Information,
          } => {
            if let Some(extension) = item.extension() {
              if let Err(e) = window.reveal_extension(&extension.id).await {
                event!(Level::WARN, error = %e, extension_id = %extension.id, "Can not reveal extension.");
              }
            }
          }
          QuickPickEvent::TriggerItemButton { .. } => continue,
          QuickPickEvent::Accept => {
            if !picker.is_valid() {
              return Ok(stage.current_code());
            }
            let extensions: Vec<Extension> = picker
              .selected_items()
              .iter()
              .filter_map(|item| item.extension().cloned())
              .collect();
            manager.set_storages(ContextPatch::new().set(TEMPLATE_EXTENSIONS, extensions));
            return Ok(stage.next_code());
          }
        }
      }
    }
  });

  Materials { step, lease }
}
