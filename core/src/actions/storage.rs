// templar/src/actions/storage.rs

//! Steps that write the wizard's answers to the template store.
//!
//! A missing answer ends the run with an error notification. A failed write is
//! logged, reported to the user and also ends the run.

use crate::actions::keys::{TEMPLATES, TEMPLATE_EXTENSIONS, TEMPLATE_ID, TEMPLATE_IDS, TEMPLATE_NAME};
use crate::commands::Command;
use crate::core::stage::Stage;
use crate::core::step::StepSlot;
use crate::error::TemplarError;
use crate::templates::store::TemplateStore;
use crate::templates::types::{TemplateIds, TemplateValue, Templates, GLOBAL_TEMPLATE_ID, GLOBAL_TEMPLATE_NAME};
use crate::ui::{MessageLevel, Window};
use std::sync::Arc;
use tracing::{event, Instrument, Level};

/// Reads `templateId` plus the name and extensions answered so far, falling
/// back to what is stored for that id. `None` after notifying the user when
/// something is missing.
fn template_answers(stage: &Stage, window: &dyn Window, store: &dyn TemplateStore) -> Option<(String, TemplateValue)> {
  let manager = stage.manager();
  let template_id = manager.get_storage(TEMPLATE_ID, String::new());
  if template_id.is_empty() {
    window.notify(MessageLevel::Error, "⛔ Template id must be not empty.");
    return None;
  }

  let stored = store.get_template_value(&template_id);
  let answers = manager.get_storages([TEMPLATE_NAME.name(), TEMPLATE_EXTENSIONS.name()]);
  let name = answers.get(TEMPLATE_NAME).unwrap_or(stored.name);
  let extensions = answers.get(TEMPLATE_EXTENSIONS).unwrap_or(stored.extensions);

  if name.is_empty() || extensions.is_empty() {
    window.notify(MessageLevel::Error, "⛔ Template name and extensions must be not empty.");
    return None;
  }
  Some((template_id, TemplateValue { name, extensions }))
}

/// Saves `templateId` with the answered name and extensions.
pub fn save_one(command: &Command, window: Arc<dyn Window>, store: Arc<dyn TemplateStore>) -> StepSlot<TemplarError> {
  let capitalized = command.capitalized_action_name();
  StepSlot::new(move |stage: Stage| {
    let window = Arc::clone(&window);
    let store = Arc::clone(&store);
    let capitalized = capitalized.clone();
    async move {
      let Some((template_id, value)) = template_answers(&stage, window.as_ref(), store.as_ref()) else {
        return Ok::<_, TemplarError>(stage.exit_code());
      };
      let name = value.name.clone();
      match store.save_one(&template_id, value).await {
        Ok(()) => Ok(stage.next_code()),
        Err(e) => {
          event!(Level::ERROR, error = %e, template_id = %template_id, "Saving template failed.");
          window.notify(MessageLevel::Error, &format!("🚫 {capitalized} template ({name}) failed."));
          Ok(stage.exit_code())
        }
      }
    }
    .instrument(tracing::info_span!("save_one"))
  })
}

/// Replaces the extensions of `templateId` with the answered ones.
pub fn edit_one(command: &Command, window: Arc<dyn Window>, store: Arc<dyn TemplateStore>) -> StepSlot<TemplarError> {
  let capitalized = command.capitalized_action_name();
  StepSlot::new(move |stage: Stage| {
    let window = Arc::clone(&window);
    let store = Arc::clone(&store);
    let capitalized = capitalized.clone();
    async move {
      let Some((template_id, value)) = template_answers(&stage, window.as_ref(), store.as_ref()) else {
        return Ok::<_, TemplarError>(stage.exit_code());
      };
      match store.edit_one(&template_id, value.extensions).await {
        Ok(()) => Ok(stage.next_code()),
        Err(e) => {
          event!(Level::ERROR, error = %e, template_id = %template_id, "Editing template failed.");
          window.notify(
            MessageLevel::Error,
            &format!("🚫 {capitalized} template ({}) failed.", value.name),
          );
          Ok(stage.exit_code())
        }
      }
    }
    .instrument(tracing::info_span!("edit_one"))
  })
}

/// Stores the answered extensions as the global template. An empty selection
/// is allowed and clears it.
pub fn edit_global(window: Arc<dyn Window>, store: Arc<dyn TemplateStore>) -> StepSlot<TemplarError> {
  StepSlot::new(move |stage: Stage| {
    let window = Arc::clone(&window);
    let store = Arc::clone(&store);
    async move {
      let extensions = stage.manager().get_storage(TEMPLATE_EXTENSIONS, Vec::new());
      let value = TemplateValue {
        name: GLOBAL_TEMPLATE_NAME.to_string(),
        extensions,
      };
      match store.save_one(GLOBAL_TEMPLATE_ID, value).await {
        Ok(()) => {
          window.notify(MessageLevel::Info, "✅ Edit global template successfully.");
          Ok::<_, TemplarError>(stage.next_code())
        }
        Err(e) => {
          event!(Level::ERROR, error = %e, "Editing global template failed.");
          window.notify(MessageLevel::Error, "🚫 Edit global template failed.");
          Ok(stage.exit_code())
        }
      }
    }
    .instrument(tracing::info_span!("edit_global"))
  })
}

/// Deletes every template in `templateIds`.
pub fn delete_many(command: &Command, window: Arc<dyn Window>, store: Arc<dyn TemplateStore>) -> StepSlot<TemplarError> {
  let capitalized = command.capitalized_action_name();
  StepSlot::new(move |stage: Stage| {
    let window = Arc::clone(&window);
    let store = Arc::clone(&store);
    let capitalized = capitalized.clone();
    async move {
      let template_ids = stage.manager().get_storage(TEMPLATE_IDS, TemplateIds::new());
      if template_ids.is_empty() {
        window.notify(MessageLevel::Warning, "⭕ No templates to delete");
        return Ok::<_, TemplarError>(stage.exit_code());
      }

      match store.delete_many(&template_ids).await {
        Ok(()) => {
          event!(Level::INFO, count = template_ids.len(), "Templates deleted.");
          window.notify(MessageLevel::Info, &format!("✅ {capitalized} templates successfully."));
          Ok(stage.next_code())
        }
        Err(e) => {
          event!(Level::ERROR, error = %e, "Deleting templates failed.");
          window.notify(MessageLevel::Error, &format!("🚫 {capitalized} templates failed."));
          Ok(stage.exit_code())
        }
      }
    }
    .instrument(tracing::info_span!("delete_many"))
  })
}

/// Gives `templateId` the name in `templateName`.
pub fn rename_one(command: &Command, window: Arc<dyn Window>, store: Arc<dyn TemplateStore>) -> StepSlot<TemplarError> {
  let capitalized = command.capitalized_action_name();
  StepSlot::new(move |stage: Stage| {
    let window = Arc::clone(&window);
    let store = Arc::clone(&store);
    let capitalized = capitalized.clone();
    async move {
      let manager = stage.manager();
      let answers = manager.get_storages([TEMPLATE_NAME.name(), TEMPLATE_ID.name()]);
      let new_name = answers.get(TEMPLATE_NAME).unwrap_or_default();
      let template_id = answers.get(TEMPLATE_ID).unwrap_or_default();

      if new_name.is_empty() || template_id.is_empty() {
        window.notify(MessageLevel::Error, "⛔ Template name and id must be not empty.");
        return Ok::<_, TemplarError>(stage.exit_code());
      }

      let old_name = store.get_template_value(&template_id).name;
      match store.rename_one(&template_id, new_name.clone()).await {
        Ok(()) => {
          window.notify(
            MessageLevel::Info,
            &format!("✅ {capitalized} ({old_name}) to ({new_name}) successfully."),
          );
          Ok(stage.next_code())
        }
        Err(e) => {
          event!(Level::ERROR, error = %e, template_id = %template_id, "Renaming template failed.");
          window.notify(
            MessageLevel::Error,
            &format!("🚫 {capitalized} ({old_name}) to ({new_name}) failed."),
          );
          Ok(stage.exit_code())
        }
      }
    }
    .instrument(tracing::info_span!("rename_one"))
  })
}

/// Replaces every stored template with the ones in `templates`.
pub fn save_many(command: &Command, window: Arc<dyn Window>, store: Arc<dyn TemplateStore>) -> StepSlot<TemplarError> {
  let capitalized = command.capitalized_action_name();
  StepSlot::new(move |stage: Stage| {
    let window = Arc::clone(&window);
    let store = Arc::clone(&store);
    let capitalized = capitalized.clone();
    async move {
      let templates = stage.manager().get_storage(TEMPLATES, Templates::new());
      if templates.is_empty() {
        window.notify(MessageLevel::Warning, "⭕ No templates to import.");
        return Ok::<_, TemplarError>(stage.exit_code());
      }

      let count = templates.len();
      match store.replace_all(templates).await {
        Ok(()) => {
          event!(Level::INFO, count, "Templates replaced.");
          window.notify(MessageLevel::Info, &format!("✅ {capitalized} successfully."));
          Ok(stage.next_code())
        }
        Err(e) => {
          event!(Level::ERROR, error = %e, "Replacing templates failed.");
          window.notify(MessageLevel::Error, &format!("🚫 {capitalized} failed."));
          Ok(stage.exit_code())
        }
      }
    }
    .instrument(tracing::info_span!("save_many"))
  })
}
