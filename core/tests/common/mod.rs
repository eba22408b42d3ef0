// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use templar::templates::{
  ApplyTemplate, Extension, ExtensionCatalog, ExtensionManifest, MemoryTemplateStore, MemoryWorkspaceStore,
  TemplateId, TemplateIds, TemplateName, TemplateStore, TemplateValue, Templates, WorkspaceStore,
};
use templar::ui::{
  Button, InputBox, InputBoxEvent, InputBoxOptions, MessageLevel, PickItem, QuickPick, QuickPickEvent,
  QuickPickOptions, Window,
};
use templar::{
  AppConfig, CommandPrefix, Stage, StageCode, StepSlot, Templar, TemplarError,
};
use tracing::Level;

// --- Common Error Type for Queue Tests ---
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Test step failed: {0}")]
  Step(String),
}

// --- Helper for Tracing Setup ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Scripted Steps ---

/// What a scripted step observed when it was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visit {
  pub code: StageCode,
  pub has_change_stage: bool,
  pub is_in_first_stage: bool,
}

pub type VisitLog = Arc<Mutex<Vec<Visit>>>;

pub fn visit_log() -> VisitLog {
  Arc::new(Mutex::new(Vec::new()))
}

/// Relative answers a scripted step can give.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
  Exit,
  Prev,
  Retry,
  Next,
  Nothing,
  Jump(StageCode),
}

impl Answer {
  fn resolve(self, stage: &Stage) -> Option<StageCode> {
    match self {
      Answer::Exit => Some(stage.exit_code()),
      Answer::Prev => Some(stage.prev_code()),
      Answer::Retry => Some(stage.current_code()),
      Answer::Next => Some(stage.next_code()),
      Answer::Nothing => None,
      Answer::Jump(code) => Some(code),
    }
  }
}

/// A step that records each visit and answers from `answers` in order,
/// repeating the last answer once the list runs out.
pub fn scripted_step(log: &VisitLog, answers: &[Answer]) -> StepSlot<TestError> {
  let log = Arc::clone(log);
  let answers = answers.to_vec();
  let calls = Arc::new(Mutex::new(0usize));
  StepSlot::new(move |stage: Stage| {
    let log = Arc::clone(&log);
    let answers = answers.clone();
    let calls = Arc::clone(&calls);
    async move {
      let manager = stage.manager();
      log.lock().push(Visit {
        code: stage.current_code(),
        has_change_stage: manager.has_change_stage(),
        is_in_first_stage: manager.is_in_first_stage(),
      });
      let call = {
        let mut calls = calls.lock();
        *calls += 1;
        *calls - 1
      };
      let answer = answers.get(call).or(answers.last()).copied().unwrap_or(Answer::Exit);
      Ok::<_, TestError>(answer.resolve(&stage))
    }
  })
}

pub fn visited_codes(log: &VisitLog) -> Vec<StageCode> {
  log.lock().iter().map(|visit| visit.code).collect()
}

// --- Scripted Host Window ---

/// One user gesture, consumed by whichever widget is waiting for an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
  /// Selects the items with these labels and accepts.
  Pick(Vec<String>),
  /// Accepts the current selection or value.
  Accept,
  /// Replaces the input value and accepts.
  Enter(String),
  /// Replaces the input value without accepting.
  Type(String),
  Button(Button),
  ItemButton(String, Button),
  Hide,
}

pub fn pick(labels: &[&str]) -> UiAction {
  UiAction::Pick(labels.iter().map(|l| l.to_string()).collect())
}

pub fn enter(value: &str) -> UiAction {
  UiAction::Enter(value.to_string())
}

/// What a widget looked like when it was shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shown {
  pub title: String,
  pub buttons: Vec<Button>,
  pub labels: Vec<String>,
  pub selected: Vec<String>,
  pub value: String,
}

#[derive(Default)]
pub struct HostState {
  pub script: VecDeque<UiAction>,
  pub answers: VecDeque<Option<String>>,
  pub save_paths: VecDeque<Option<PathBuf>>,
  pub open_paths: VecDeque<Option<PathBuf>>,
  pub notifications: Vec<(MessageLevel, String)>,
  pub questions: Vec<String>,
  pub shown: Vec<Shown>,
  pub validation_messages: Vec<Option<String>>,
  pub revealed: Vec<String>,
  pub created: usize,
  pub disposed: usize,
}

#[derive(Clone, Default)]
pub struct FakeWindow {
  pub state: Arc<Mutex<HostState>>,
}

impl FakeWindow {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn script(&self, actions: impl IntoIterator<Item = UiAction>) -> &Self {
    self.state.lock().script.extend(actions);
    self
  }

  pub fn answer(&self, answer: Option<&str>) -> &Self {
    self.state.lock().answers.push_back(answer.map(str::to_string));
    self
  }

  pub fn save_to(&self, path: Option<PathBuf>) -> &Self {
    self.state.lock().save_paths.push_back(path);
    self
  }

  pub fn open_from(&self, path: Option<PathBuf>) -> &Self {
    self.state.lock().open_paths.push_back(path);
    self
  }

  pub fn messages(&self) -> Vec<String> {
    self.state.lock().notifications.iter().map(|(_, m)| m.clone()).collect()
  }

  pub fn messages_at(&self, level: MessageLevel) -> Vec<String> {
    self
      .state
      .lock()
      .notifications
      .iter()
      .filter(|(l, _)| *l == level)
      .map(|(_, m)| m.clone())
      .collect()
  }

  pub fn shown(&self) -> Vec<Shown> {
    self.state.lock().shown.clone()
  }

  pub fn remaining_script(&self) -> usize {
    self.state.lock().script.len()
  }

  /// Every widget created so far has been disposed.
  pub fn all_disposed(&self) -> bool {
    let state = self.state.lock();
    state.created == state.disposed
  }

  fn next_action(&self) -> UiAction {
    self.state.lock().script.pop_front().unwrap_or(UiAction::Hide)
  }
}

#[async_trait]
impl Window for FakeWindow {
  fn create_quick_pick(&self) -> Box<dyn QuickPick> {
    self.state.lock().created += 1;
    Box::new(FakeQuickPick {
      host: self.clone(),
      title: String::new(),
      items: Vec::new(),
      selected: Vec::new(),
      buttons: Vec::new(),
      disposed: false,
    })
  }

  fn create_input_box(&self) -> Box<dyn InputBox> {
    self.state.lock().created += 1;
    Box::new(FakeInputBox {
      host: self.clone(),
      title: String::new(),
      value: String::new(),
      buttons: Vec::new(),
      disposed: false,
    })
  }

  fn notify(&self, level: MessageLevel, message: &str) {
    self.state.lock().notifications.push((level, message.to_string()));
  }

  async fn ask(&self, _level: MessageLevel, message: &str, _actions: &[&str]) -> Option<String> {
    let mut state = self.state.lock();
    state.questions.push(message.to_string());
    state.answers.pop_front().flatten()
  }

  async fn show_save_dialog(&self, _options: templar::ui::FileDialogOptions) -> Option<PathBuf> {
    self.state.lock().save_paths.pop_front().flatten()
  }

  async fn show_open_dialog(&self, _options: templar::ui::FileDialogOptions) -> Option<PathBuf> {
    self.state.lock().open_paths.pop_front().flatten()
  }

  async fn reveal_extension(&self, extension_id: &str) -> anyhow::Result<()> {
    self.state.lock().revealed.push(extension_id.to_string());
    Ok(())
  }
}

struct FakeQuickPick {
  host: FakeWindow,
  title: String,
  items: Vec<PickItem>,
  selected: Vec<PickItem>,
  buttons: Vec<Button>,
  disposed: bool,
}

#[async_trait]
impl QuickPick for FakeQuickPick {
  fn configure(&mut self, options: &QuickPickOptions) {
    self.title = options.title.clone();
  }

  fn items(&self) -> Vec<PickItem> {
    self.items.clone()
  }

  fn set_items(&mut self, items: Vec<PickItem>) {
    self.items = items;
  }

  fn selected_items(&self) -> Vec<PickItem> {
    self.selected.clone()
  }

  fn set_selected_items(&mut self, items: Vec<PickItem>) {
    self.selected = items;
  }

  fn set_buttons(&mut self, buttons: Vec<Button>) {
    self.buttons = buttons;
  }

  fn show(&mut self) {
    self.host.state.lock().shown.push(Shown {
      title: self.title.clone(),
      buttons: self.buttons.clone(),
      labels: self.items.iter().map(|i| i.label.clone()).collect(),
      selected: self.selected.iter().map(|i| i.label.clone()).collect(),
      value: String::new(),
    });
  }

  fn hide(&mut self) {}

  fn dispose(&mut self) {
    if !self.disposed {
      self.disposed = true;
      self.host.state.lock().disposed += 1;
    }
  }

  async fn next_event(&mut self) -> QuickPickEvent {
    match self.host.next_action() {
      UiAction::Pick(labels) => {
        self.selected = self
          .items
          .iter()
          .filter(|item| labels.contains(&item.label))
          .cloned()
          .collect();
        QuickPickEvent::Accept
      }
      UiAction::Accept | UiAction::Enter(_) | UiAction::Type(_) => QuickPickEvent::Accept,
      UiAction::Button(button) => QuickPickEvent::TriggerButton(button),
      UiAction::ItemButton(label, button) => match self.items.iter().find(|i| i.label == label) {
        Some(item) => QuickPickEvent::TriggerItemButton {
          item: item.clone(),
          button,
        },
        None => QuickPickEvent::Hide,
      },
      UiAction::Hide => QuickPickEvent::Hide,
    }
  }
}

struct FakeInputBox {
  host: FakeWindow,
  title: String,
  value: String,
  buttons: Vec<Button>,
  disposed: bool,
}

#[async_trait]
impl InputBox for FakeInputBox {
  fn configure(&mut self, options: &InputBoxOptions) {
    self.title = options.title.clone();
  }

  fn value(&self) -> String {
    self.value.clone()
  }

  fn set_value(&mut self, value: String) {
    self.value = value;
  }

  fn set_validation_message(&mut self, message: Option<String>) {
    self.host.state.lock().validation_messages.push(message);
  }

  fn set_buttons(&mut self, buttons: Vec<Button>) {
    self.buttons = buttons;
  }

  fn show(&mut self) {
    self.host.state.lock().shown.push(Shown {
      title: self.title.clone(),
      buttons: self.buttons.clone(),
      labels: Vec::new(),
      selected: Vec::new(),
      value: self.value.clone(),
    });
  }

  fn hide(&mut self) {}

  fn dispose(&mut self) {
    if !self.disposed {
      self.disposed = true;
      self.host.state.lock().disposed += 1;
    }
  }

  async fn next_event(&mut self) -> InputBoxEvent {
    match self.host.next_action() {
      UiAction::Enter(value) => {
        self.value = value;
        InputBoxEvent::Accept
      }
      UiAction::Type(value) => {
        self.value = value.clone();
        InputBoxEvent::ChangeValue(value)
      }
      UiAction::Accept | UiAction::Pick(_) | UiAction::ItemButton(..) => InputBoxEvent::Accept,
      UiAction::Button(button) => InputBoxEvent::TriggerButton(button),
      UiAction::Hide => InputBoxEvent::Hide,
    }
  }
}

// --- Collaborator Doubles ---

pub struct StaticCatalog {
  pub manifests: Vec<ExtensionManifest>,
}

#[async_trait]
impl ExtensionCatalog for StaticCatalog {
  async fn installed_manifests(&self, _localize: bool) -> Vec<ExtensionManifest> {
    self.manifests.clone()
  }
}

pub fn manifest(publisher: &str, name: &str, display_name: &str) -> ExtensionManifest {
  ExtensionManifest {
    name: name.to_string(),
    publisher: publisher.to_string(),
    display_name: Some(display_name.to_string()),
    description: None,
    metadata: None,
  }
}

/// Installed: `rust-lang.rust-analyzer` ("Rust"), `ms-python.python`
/// ("Python"), `eamodio.gitlens` ("GitLens").
pub fn default_catalog() -> StaticCatalog {
  StaticCatalog {
    manifests: vec![
      manifest("rust-lang", "rust-analyzer", "Rust"),
      manifest("ms-python", "python", "Python"),
      manifest("eamodio", "gitlens", "GitLens"),
    ],
  }
}

pub fn template_value(name: &str, ids: &[&str]) -> TemplateValue {
  TemplateValue {
    name: name.to_string(),
    extensions: ids.iter().map(|id| Extension::new(*id)).collect(),
  }
}

/// A template store whose writes always fail.
#[derive(Default)]
pub struct FailingStore {
  pub inner: MemoryTemplateStore,
}

#[async_trait]
impl TemplateStore for FailingStore {
  fn get_template_value(&self, template_id: &str) -> TemplateValue {
    self.inner.get_template_value(template_id)
  }

  fn get_all_templates(&self) -> Vec<templar::templates::Template> {
    self.inner.get_all_templates()
  }

  fn get_all_template_ids(&self) -> TemplateIds {
    self.inner.get_all_template_ids()
  }

  async fn save_one(&self, _template_id: &str, _template_value: TemplateValue) -> anyhow::Result<()> {
    anyhow::bail!("disk full")
  }

  async fn delete_one(&self, _template_id: &str) -> anyhow::Result<()> {
    anyhow::bail!("disk full")
  }

  async fn edit_one(&self, _template_id: &str, _extensions: Vec<Extension>) -> anyhow::Result<()> {
    anyhow::bail!("disk full")
  }

  async fn rename_one(&self, _template_id: &str, _name: TemplateName) -> anyhow::Result<()> {
    anyhow::bail!("disk full")
  }

  async fn save_many(&self, _templates: Templates) -> anyhow::Result<()> {
    anyhow::bail!("disk full")
  }

  async fn delete_many(&self, _template_ids: &TemplateIds) -> anyhow::Result<()> {
    anyhow::bail!("disk full")
  }
}

/// A workspace store whose writes always fail.
#[derive(Default)]
pub struct FailingWorkspace;

#[async_trait]
impl WorkspaceStore for FailingWorkspace {
  fn applied_template_id(&self) -> Option<TemplateId> {
    None
  }

  async fn apply_template(&self, _apply: ApplyTemplate) -> anyhow::Result<()> {
    anyhow::bail!("workspace is read-only")
  }
}

// --- Activated Application ---

pub const PREFIX: &str = "test-templates";

pub fn command_name(action: &str) -> String {
  CommandPrefix::new(PREFIX).qualify(action)
}

pub fn test_config(data_dir: PathBuf) -> AppConfig {
  AppConfig {
    command_prefix: CommandPrefix::new(PREFIX),
    extensions_dir: data_dir.join("extensions"),
    data_dir,
    log_filter: "debug".to_string(),
  }
}

pub struct Harness {
  pub app: Templar,
  pub window: FakeWindow,
  pub templates: Arc<MemoryTemplateStore>,
  pub workspace: Arc<MemoryWorkspaceStore>,
}

impl Harness {
  pub fn new(templates: Templates) -> Self {
    let window = FakeWindow::new();
    let templates = Arc::new(MemoryTemplateStore::with_templates(templates));
    let workspace = Arc::new(MemoryWorkspaceStore::new());
    let app = Templar::activate(
      &test_config(std::env::temp_dir()),
      Arc::new(window.clone()),
      Arc::new(default_catalog()),
      templates.clone(),
      workspace.clone(),
    );
    Self {
      app,
      window,
      templates,
      workspace,
    }
  }

  pub async fn run(&self, action: &str, args: templar::CommandArgs) -> Result<(), TemplarError> {
    self.app.execute(&command_name(action), args).await
  }
}

/// Two templates: `t-rust` ("Rust") and `t-py` ("Python").
pub fn two_templates() -> Templates {
  let mut templates = Templates::new();
  templates.insert("t-rust".to_string(), template_value("Rust", &["rust-lang.rust-analyzer"]));
  templates.insert("t-py".to_string(), template_value("Python", &["ms-python.python"]));
  templates
}
