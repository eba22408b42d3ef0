// templar/src/actions/templates.rs

//! Steps that pick templates or name one.

use crate::actions::keys::{always_reassign, NEED_REASSIGN, TEMPLATE_ID, TEMPLATE_IDS, TEMPLATE_NAME};
use crate::actions::Materials;
use crate::commands::Command;
use crate::core::context::ContextPatch;
use crate::core::stage::Stage;
use crate::core::step::{step_fn, StepFn};
use crate::error::TemplarError;
use crate::templates::store::TemplateStore;
use crate::templates::types::TemplateIds;
use crate::ui::{
  Button, InputBoxEvent, InputBoxOptions, MessageLevel, NameInput, PickItem, Picker, QuickPickEvent,
  QuickPickOptions, WidgetLease, Window,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{event, Level};

#[derive(Debug, Clone, Default)]
pub struct NameTemplateOptions {
  pub title: String,
  pub placeholder: String,
}

impl NameTemplateOptions {
  pub fn new(title: impl Into<String>, placeholder: impl Into<String>) -> Self {
    Self {
      title: title.into(),
      placeholder: placeholder.into(),
    }
  }
}

/// Asks for a template name.
///
/// The box starts with `templateName` if a previous step wrote one, else with
/// the stored name of `templateId`. A valid name is written to `templateName`.
pub fn name_template(
  window: Arc<dyn Window>,
  store: Arc<dyn TemplateStore>,
  options: NameTemplateOptions,
) -> Materials {
  let input = NameInput::new(
    window.as_ref(),
    InputBoxOptions {
      title: options.title,
      placeholder: options.placeholder,
    },
    store.get_all_template_names(),
  )
  .shared();
  let lease = WidgetLease::new(Arc::clone(&input));

  let step: StepFn<TemplarError> = step_fn(move |stage: Stage| {
    let input = Arc::clone(&input);
    let store = Arc::clone(&store);
    async move {
      let manager = stage.manager();
      let mut input = input.lock().await;

      if manager.is_in_first_stage() {
        input.set_buttons(vec![Button::Close]);
      } else {
        input.set_buttons(vec![Button::Back, Button::Close]);
      }

      let template_id = manager.get_storage(TEMPLATE_ID, String::new());
      let stored_name = store.get_template_value(&template_id).name;
      let template_name = manager.get_storage(TEMPLATE_NAME, stored_name);

      input.set_value(template_name);
      input.show();

      loop {
        match input.next_event().await {
          InputBoxEvent::Hide => return Ok::<_, TemplarError>(stage.exit_code()),
          InputBoxEvent::TriggerButton(Button::Back) => return Ok(stage.prev_code()),
          InputBoxEvent::TriggerButton(_) => return Ok(stage.exit_code()),
          InputBoxEvent::Accept => {
            if input.is_valid() {
              manager.set_storages(ContextPatch::new().set(TEMPLATE_NAME, input.value()));
              return Ok(stage.next_code());
            }
            return Ok(stage.current_code());
          }
          InputBoxEvent::ChangeValue(_) => continue,
        }
      }
    }
  });

  Materials { step, lease }
}

/// Lets the user pick one template (`templateId`) or several (`templateIds`).
///
/// Items are loaded from the store on the first execution. Afterwards they are
/// reloaded when the `needReassign` policy in the context answers true for the
/// current `has_change_stage`; without a policy they are always reloaded.
pub fn select_templates(
  command: &Command,
  window: Arc<dyn Window>,
  store: Arc<dyn TemplateStore>,
  can_select_many: bool,
) -> Materials {
  let picker = Picker::new(
    Arc::clone(&window),
    QuickPickOptions {
      title: format!("Select template you want to {}", command.action_name()),
      can_select_many,
      ignore_focus_out: false,
    },
    true,
  )
  .shared();
  let lease = WidgetLease::new(Arc::clone(&picker));
  let action_name = command.action_name().to_string();
  let is_first_execution = Arc::new(AtomicBool::new(true));

  let step: StepFn<TemplarError> = step_fn(move |stage: Stage| {
    let picker = Arc::clone(&picker);
    let window = Arc::clone(&window);
    let store = Arc::clone(&store);
    let action_name = action_name.clone();
    let is_first_execution = Arc::clone(&is_first_execution);
    async move {
      let manager = stage.manager();
      let mut picker = picker.lock().await;

      if manager.is_in_first_stage() {
        picker.set_buttons(vec![Button::Close]);
      } else {
        picker.set_buttons(vec![Button::Close, Button::Back]);
      }

      let reload = if is_first_execution.swap(false, Ordering::SeqCst) {
        true
      } else {
        let need_reassign = manager.get_storage(NEED_REASSIGN, always_reassign());
        need_reassign(manager.has_change_stage())
      };
      if reload {
        let items = store.get_all_templates().iter().map(PickItem::from_template).collect();
        picker.set_items(items);
      } else {
        // Re-showing does not render the old items unless they are set again.
        let items = picker.items();
        picker.set_items(items);
      }
      let selected = picker.selected_items();
      picker.set_selected_items(selected);

      if picker.items().is_empty() {
        window.notify(MessageLevel::Info, &format!("⭕ No templates to {action_name}."));
        return Ok::<_, TemplarError>(stage.exit_code());
      }

      picker.show();

      loop {
        match picker.next_event().await {
          QuickPickEvent::Hide => return Ok(stage.exit_code()),
          QuickPickEvent::TriggerButton(Button::Back) => return Ok(stage.prev_code()),
          QuickPickEvent::TriggerButton(_) => return Ok(stage.exit_code()),
          QuickPickEvent::TriggerItemButton { .. } => continue,
          QuickPickEvent::Accept => {
            if !picker.is_valid() {
              return Ok(stage.current_code());
            }
            let selected = picker.selected_items();
            let patch = if can_select_many {
              let ids: TemplateIds = selected
                .iter()
                .filter_map(|item| item.template_id().map(str::to_string))
                .collect();
              ContextPatch::new().set(TEMPLATE_IDS, ids)
            } else {
              let id = selected
                .first()
                .and_then(|item| item.template_id())
                .unwrap_or_default()
                .to_string();
              ContextPatch::new().set(TEMPLATE_ID, id)
            };
            event!(Level::DEBUG, selected = selected.len(), "Templates selected.");
            manager.set_storages(patch);
            return Ok(stage.next_code());
          }
        }
      }
    }
  });

  Materials { step, lease }
}
