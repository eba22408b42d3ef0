// templar/src/ui/widgets.rs

//! Host widgets with the validation rules the wizards need, and the lease that
//! guarantees they are disposed once the owning command invocation is done.

use crate::templates::types::TemplateNames;
use crate::ui::{
  Button, InputBox, InputBoxEvent, InputBoxOptions, MessageLevel, PickItem, QuickPick, QuickPickEvent,
  QuickPickOptions, Window,
};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{event, Level};

pub trait Disposable: Send {
  fn dispose(&mut self);
}

/// A quick pick that can require at least one selected item.
///
/// Accepting a valid selection hides the widget. Accepting an empty selection
/// on a required multi-select pick reminds the user to select something.
pub struct Picker {
  quick_pick: Box<dyn QuickPick>,
  window: Arc<dyn Window>,
  can_select_many: bool,
  required: bool,
}

impl Picker {
  pub fn new(window: Arc<dyn Window>, options: QuickPickOptions, required: bool) -> Self {
    let mut quick_pick = window.create_quick_pick();
    quick_pick.configure(&options);
    Self {
      quick_pick,
      window,
      can_select_many: options.can_select_many,
      required,
    }
  }

  pub fn shared(self) -> Arc<Mutex<Self>> {
    Arc::new(Mutex::new(self))
  }

  pub fn is_valid(&self) -> bool {
    !self.required || !self.quick_pick.selected_items().is_empty()
  }

  pub fn can_select_many(&self) -> bool {
    self.can_select_many
  }

  pub fn items(&self) -> Vec<PickItem> {
    self.quick_pick.items()
  }

  pub fn set_items(&mut self, items: Vec<PickItem>) {
    self.quick_pick.set_items(items);
  }

  pub fn selected_items(&self) -> Vec<PickItem> {
    self.quick_pick.selected_items()
  }

  pub fn set_selected_items(&mut self, items: Vec<PickItem>) {
    self.quick_pick.set_selected_items(items);
  }

  pub fn set_buttons(&mut self, buttons: Vec<Button>) {
    self.quick_pick.set_buttons(buttons);
  }

  pub fn show(&mut self) {
    self.quick_pick.show();
  }

  pub fn hide(&mut self) {
    self.quick_pick.hide();
  }

  pub async fn next_event(&mut self) -> QuickPickEvent {
    let event = self.quick_pick.next_event().await;
    if event == QuickPickEvent::Accept {
      if self.is_valid() {
        self.quick_pick.hide();
      } else if self.can_select_many {
        self.window.notify(MessageLevel::Info, "✏ Please select at least one item.");
      }
    }
    event
  }
}

impl Disposable for Picker {
  fn dispose(&mut self) {
    self.quick_pick.dispose();
  }
}

impl fmt::Debug for Picker {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Picker")
      .field("can_select_many", &self.can_select_many)
      .field("required", &self.required)
      .finish_non_exhaustive()
  }
}

/// An input box for template names. A name is valid when it is not empty and
/// no existing template already uses it.
pub struct NameInput {
  input_box: Box<dyn InputBox>,
  existing_names: TemplateNames,
}

impl NameInput {
  pub const EMPTY_NAME: &'static str = "Name must be not empty.";
  pub const DUPLICATE_NAME: &'static str = "Name already exists.";

  /// `existing_names` is captured once; names created later in the same
  /// invocation are not considered.
  pub fn new(window: &dyn Window, options: InputBoxOptions, existing_names: TemplateNames) -> Self {
    let mut input_box = window.create_input_box();
    input_box.configure(&options);
    Self {
      input_box,
      existing_names,
    }
  }

  pub fn shared(self) -> Arc<Mutex<Self>> {
    Arc::new(Mutex::new(self))
  }

  pub fn validation_message(&self, value: &str) -> Option<&'static str> {
    if value.is_empty() {
      Some(Self::EMPTY_NAME)
    } else if self.existing_names.contains(value) {
      Some(Self::DUPLICATE_NAME)
    } else {
      None
    }
  }

  pub fn is_valid(&self) -> bool {
    self.validation_message(&self.input_box.value()).is_none()
  }

  pub fn value(&self) -> String {
    self.input_box.value()
  }

  pub fn set_value(&mut self, value: String) {
    self.input_box.set_value(value);
  }

  pub fn set_buttons(&mut self, buttons: Vec<Button>) {
    self.input_box.set_buttons(buttons);
  }

  pub fn show(&mut self) {
    self.input_box.show();
  }

  pub async fn next_event(&mut self) -> InputBoxEvent {
    let event = self.input_box.next_event().await;
    match &event {
      InputBoxEvent::ChangeValue(value) => {
        let message = self.validation_message(value).map(str::to_string);
        self.input_box.set_validation_message(message);
      }
      InputBoxEvent::Accept => {
        let value = self.input_box.value();
        match self.validation_message(&value) {
          None => self.input_box.hide(),
          Some(message) => self.input_box.set_validation_message(Some(message.to_string())),
        }
      }
      InputBoxEvent::Hide | InputBoxEvent::TriggerButton(_) => {}
    }
    event
  }
}

impl Disposable for NameInput {
  fn dispose(&mut self) {
    self.input_box.dispose();
  }
}

impl fmt::Debug for NameInput {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("NameInput")
      .field("existing_names", &self.existing_names.len())
      .finish_non_exhaustive()
  }
}

/// Owns the disposal of one shared widget.
///
/// `cleanup()` disposes it once any running step has let go of it. Dropping
/// the lease without `cleanup()` disposes it right away if nobody holds it,
/// which covers early returns and panics in the invoking command.
#[must_use = "dropping the lease disposes the widget"]
pub struct WidgetLease {
  widget: Option<Arc<Mutex<dyn Disposable>>>,
}

impl WidgetLease {
  pub fn new<W: Disposable + 'static>(widget: Arc<Mutex<W>>) -> Self {
    let widget: Arc<Mutex<dyn Disposable>> = widget;
    Self { widget: Some(widget) }
  }

  /// A lease for materials that own no widget.
  pub fn none() -> Self {
    Self { widget: None }
  }

  pub async fn cleanup(mut self) {
    if let Some(widget) = self.widget.take() {
      widget.lock().await.dispose();
    }
  }
}

impl Drop for WidgetLease {
  fn drop(&mut self) {
    let Some(widget) = self.widget.take() else {
      return;
    };
    match widget.try_lock() {
      Ok(mut guard) => guard.dispose(),
      Err(_) => event!(Level::WARN, "Widget still in use when its lease was dropped; not disposed."),
    };
  }
}

impl fmt::Debug for WidgetLease {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("WidgetLease")
      .field("held", &self.widget.is_some())
      .finish()
  }
}
