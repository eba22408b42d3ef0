// templar/src/ui/mod.rs

//! Contracts for the host's prompt widgets and window services.
//!
//! Widgets are driven by pulling events: a step calls `show()` and then awaits
//! `next_event()` until it sees something that decides its answer. Events
//! belong to the widget's current showing; calling `hide()` from code does not
//! produce a `Hide` event.

pub mod widgets;

use crate::templates::types::{Extension, ExtensionManifest, Template, TemplateId};
use async_trait::async_trait;
use std::path::PathBuf;

pub use widgets::{Disposable, NameInput, Picker, WidgetLease};

/// Title-bar and item buttons. Buttons are told apart by their tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
  Back,
  Close,
  Information,
}

impl Button {
  pub fn tooltip(&self) -> &'static str {
    match self {
      Button::Back => "back",
      Button::Close => "close",
      Button::Information => "go to this extension",
    }
  }
}

/// What a pick item stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickPayload {
  Template(TemplateId),
  Extension(Extension),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickItem {
  pub label: String,
  pub description: Option<String>,
  pub detail: Option<String>,
  pub picked: bool,
  pub buttons: Vec<Button>,
  pub payload: PickPayload,
}

impl PickItem {
  pub fn from_template(template: &Template) -> Self {
    Self {
      label: template.name.clone(),
      description: None,
      detail: Some(template.id.clone()),
      picked: false,
      buttons: Vec::new(),
      payload: PickPayload::Template(template.id.clone()),
    }
  }

  pub fn from_manifest(manifest: &ExtensionManifest, picked: bool, buttons: Vec<Button>) -> Self {
    let extension = manifest.to_extension();
    Self {
      label: manifest.label().to_string(),
      description: manifest.description.clone(),
      detail: Some(extension.id.clone()),
      picked,
      buttons,
      payload: PickPayload::Extension(extension),
    }
  }

  pub fn template_id(&self) -> Option<&str> {
    match &self.payload {
      PickPayload::Template(id) => Some(id),
      PickPayload::Extension(_) => None,
    }
  }

  pub fn extension(&self) -> Option<&Extension> {
    match &self.payload {
      PickPayload::Extension(extension) => Some(extension),
      PickPayload::Template(_) => None,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuickPickOptions {
  pub title: String,
  pub can_select_many: bool,
  pub ignore_focus_out: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuickPickEvent {
  Accept,
  Hide,
  TriggerButton(Button),
  TriggerItemButton { item: PickItem, button: Button },
}

/// A selection prompt provided by the host.
#[async_trait]
pub trait QuickPick: Send {
  fn configure(&mut self, options: &QuickPickOptions);

  fn items(&self) -> Vec<PickItem>;

  fn set_items(&mut self, items: Vec<PickItem>);

  fn selected_items(&self) -> Vec<PickItem>;

  fn set_selected_items(&mut self, items: Vec<PickItem>);

  fn set_buttons(&mut self, buttons: Vec<Button>);

  fn show(&mut self);

  fn hide(&mut self);

  fn dispose(&mut self);

  async fn next_event(&mut self) -> QuickPickEvent;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBoxOptions {
  pub title: String,
  pub placeholder: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputBoxEvent {
  Accept,
  Hide,
  TriggerButton(Button),
  ChangeValue(String),
}

/// A text prompt provided by the host.
#[async_trait]
pub trait InputBox: Send {
  fn configure(&mut self, options: &InputBoxOptions);

  fn value(&self) -> String;

  fn set_value(&mut self, value: String);

  /// `None` clears the message.
  fn set_validation_message(&mut self, message: Option<String>);

  fn set_buttons(&mut self, buttons: Vec<Button>);

  fn show(&mut self);

  fn hide(&mut self);

  fn dispose(&mut self);

  async fn next_event(&mut self) -> InputBoxEvent;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
  Info,
  Warning,
  Error,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileDialogOptions {
  pub title: String,
  pub label: String,
  pub default_path: Option<PathBuf>,
  /// Filter name and the file extensions it accepts.
  pub filters: Vec<(String, Vec<String>)>,
}

impl FileDialogOptions {
  pub fn json(title: impl Into<String>, label: impl Into<String>) -> Self {
    Self {
      title: title.into(),
      label: label.into(),
      default_path: None,
      filters: vec![("JSON".to_string(), vec!["json".to_string()])],
    }
  }

  pub fn with_default_path(mut self, path: impl Into<PathBuf>) -> Self {
    self.default_path = Some(path.into());
    self
  }
}

/// Window-level services of the host.
#[async_trait]
pub trait Window: Send + Sync {
  fn create_quick_pick(&self) -> Box<dyn QuickPick>;

  fn create_input_box(&self) -> Box<dyn InputBox>;

  /// Shows a notification without waiting for it to be dismissed.
  fn notify(&self, level: MessageLevel, message: &str);

  /// Shows a message with action buttons; resolves to the chosen action, or
  /// `None` when dismissed.
  async fn ask(&self, level: MessageLevel, message: &str, actions: &[&str]) -> Option<String>;

  async fn show_save_dialog(&self, options: FileDialogOptions) -> Option<PathBuf>;

  async fn show_open_dialog(&self, options: FileDialogOptions) -> Option<PathBuf>;

  /// Brings an installed extension into view.
  async fn reveal_extension(&self, extension_id: &str) -> anyhow::Result<()>;
}
