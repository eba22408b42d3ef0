// templar/src/templates/store.rs

//! Template persistence. Reads are synchronous snapshots; writes are async and
//! independently failable.

use crate::templates::types::{
  extension_ids, ExportedData, Extension, ExtensionIds, Template, TemplateIds, TemplateName,
  TemplateNames, TemplateValue, Templates, GLOBAL_TEMPLATE_ID,
};
use anyhow::Context as AnyhowContext;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use tracing::{event, instrument, Level};

/// Extensions to enable and to disable when a template is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitExtensions {
  pub enabled: Vec<Extension>,
  pub disabled: Vec<Extension>,
}

#[async_trait]
pub trait TemplateStore: Send + Sync {
  /// The stored template, or `TemplateValue::empty()` when absent.
  fn get_template_value(&self, template_id: &str) -> TemplateValue;

  fn get_all_templates(&self) -> Vec<Template>;

  fn get_all_template_ids(&self) -> TemplateIds;

  fn get_all_template_names(&self) -> TemplateNames {
    self.get_all_templates().into_iter().map(|t| t.name).collect()
  }

  fn get_extension_ids(&self, template_id: &str) -> ExtensionIds {
    extension_ids(&self.get_template_value(template_id).extensions)
  }

  /// Splits `installed` against a template: enabled are the template's
  /// extensions plus the global template's; disabled is everything else that
  /// is installed. Both are empty for an unknown template.
  fn split_extensions(&self, template_id: &str, installed: &[Extension]) -> SplitExtensions {
    let template_value = self.get_template_value(template_id);
    if template_value.is_empty() {
      return SplitExtensions::default();
    }

    let mut enabled = template_value.extensions;
    let mut enabled_ids = extension_ids(&enabled);
    for extension in self.get_template_value(GLOBAL_TEMPLATE_ID).extensions {
      if enabled_ids.insert(extension.id.clone()) {
        enabled.push(extension);
      }
    }

    let disabled = installed
      .iter()
      .filter(|e| !enabled_ids.contains(&e.id))
      .cloned()
      .collect();

    SplitExtensions { enabled, disabled }
  }

  async fn save_one(&self, template_id: &str, template_value: TemplateValue) -> anyhow::Result<()>;

  async fn delete_one(&self, template_id: &str) -> anyhow::Result<()>;

  /// Replaces the extensions of an existing template. No-op when absent.
  async fn edit_one(&self, template_id: &str, extensions: Vec<Extension>) -> anyhow::Result<()>;

  /// Replaces the name of an existing template. No-op when absent.
  async fn rename_one(&self, template_id: &str, name: TemplateName) -> anyhow::Result<()>;

  /// Overwrites templates with the same id.
  async fn save_many(&self, templates: Templates) -> anyhow::Result<()>;

  async fn delete_many(&self, template_ids: &TemplateIds) -> anyhow::Result<()>;

  /// Deletes every listed template. The global template is kept.
  async fn delete_all(&self) -> anyhow::Result<()> {
    let ids = self.get_all_template_ids();
    self.delete_many(&ids).await
  }

  /// Replaces every listed template with `templates`, keeping the global one.
  async fn replace_all(&self, templates: Templates) -> anyhow::Result<()> {
    self.delete_all().await?;
    self.save_many(templates).await
  }
}

/// Removes every listed template from `templates`, keeping the global one.
fn retain_global(templates: &mut Templates) {
  templates.retain(|id, _| !is_listed(id));
}

// --- In-memory store ---

#[derive(Debug, Default)]
pub struct MemoryTemplateStore {
  templates: RwLock<Templates>,
}

impl MemoryTemplateStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_templates(templates: Templates) -> Self {
    Self {
      templates: RwLock::new(templates),
    }
  }

  pub fn snapshot(&self) -> Templates {
    self.templates.read().clone()
  }

  fn update_one(&self, template_id: &str, update: impl FnOnce(&mut TemplateValue)) {
    if let Some(value) = self.templates.write().get_mut(template_id) {
      update(value);
    }
  }

  fn replace(&self, templates: Templates) {
    *self.templates.write() = templates;
  }
}

fn is_listed(template_id: &str) -> bool {
  template_id != GLOBAL_TEMPLATE_ID
}

#[async_trait]
impl TemplateStore for MemoryTemplateStore {
  fn get_template_value(&self, template_id: &str) -> TemplateValue {
    self.templates.read().get(template_id).cloned().unwrap_or_default()
  }

  fn get_all_templates(&self) -> Vec<Template> {
    self
      .templates
      .read()
      .iter()
      .filter(|(id, _)| is_listed(id))
      .map(|(id, value)| Template::from_value(id.clone(), value.clone()))
      .collect()
  }

  fn get_all_template_ids(&self) -> TemplateIds {
    self.templates.read().keys().filter(|id| is_listed(id)).cloned().collect()
  }

  async fn save_one(&self, template_id: &str, template_value: TemplateValue) -> anyhow::Result<()> {
    self.templates.write().insert(template_id.to_string(), template_value);
    Ok(())
  }

  async fn delete_one(&self, template_id: &str) -> anyhow::Result<()> {
    self.templates.write().remove(template_id);
    Ok(())
  }

  async fn edit_one(&self, template_id: &str, extensions: Vec<Extension>) -> anyhow::Result<()> {
    self.update_one(template_id, |value| value.extensions = extensions);
    Ok(())
  }

  async fn rename_one(&self, template_id: &str, name: TemplateName) -> anyhow::Result<()> {
    self.update_one(template_id, |value| value.name = name);
    Ok(())
  }

  async fn save_many(&self, templates: Templates) -> anyhow::Result<()> {
    self.templates.write().extend(templates);
    Ok(())
  }

  async fn delete_many(&self, template_ids: &TemplateIds) -> anyhow::Result<()> {
    let mut guard = self.templates.write();
    for id in template_ids {
      guard.remove(id);
    }
    Ok(())
  }

  async fn replace_all(&self, templates: Templates) -> anyhow::Result<()> {
    let mut guard = self.templates.write();
    retain_global(&mut guard);
    guard.extend(templates);
    Ok(())
  }
}

// --- JSON file store ---

/// A `MemoryTemplateStore` persisted to a JSON file (the export format) after
/// every write.
#[derive(Debug)]
pub struct JsonFileTemplateStore {
  path: PathBuf,
  inner: MemoryTemplateStore,
  write_lock: tokio::sync::Mutex<()>,
}

impl JsonFileTemplateStore {
  /// Loads templates from `path`. A missing file is an empty store.
  #[instrument(name = "JsonFileTemplateStore::open", skip_all)]
  pub async fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
    let path = path.into();
    let templates = match tokio::fs::read_to_string(&path).await {
      Ok(text) => {
        serde_json::from_str::<ExportedData>(&text)
          .with_context(|| format!("Can not parse template store {}", path.display()))?
          .templates
      }
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        event!(Level::DEBUG, path = %path.display(), "Template store file does not exist yet; starting empty.");
        Templates::new()
      }
      Err(e) => return Err(e).with_context(|| format!("Can not read template store {}", path.display())),
    };

    Ok(Self {
      path,
      inner: MemoryTemplateStore::with_templates(templates),
      write_lock: tokio::sync::Mutex::new(()),
    })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Applies `change` to a copy of the templates, writes the copy and only
  /// then makes it visible. A failed write leaves the store as it was.
  async fn commit(&self, change: impl FnOnce(&mut Templates)) -> anyhow::Result<()> {
    let _guard = self.write_lock.lock().await;
    let mut templates = self.inner.snapshot();
    change(&mut templates);

    let data = ExportedData { templates };
    let text = serde_json::to_string_pretty(&data)?;
    if let Some(parent) = self.path.parent() {
      tokio::fs::create_dir_all(parent)
        .await
        .with_context(|| format!("Can not create {}", parent.display()))?;
    }
    tokio::fs::write(&self.path, text)
      .await
      .with_context(|| format!("Can not write template store {}", self.path.display()))?;

    self.inner.replace(data.templates);
    event!(Level::TRACE, path = %self.path.display(), "Template store persisted.");
    Ok(())
  }
}

#[async_trait]
impl TemplateStore for JsonFileTemplateStore {
  fn get_template_value(&self, template_id: &str) -> TemplateValue {
    self.inner.get_template_value(template_id)
  }

  fn get_all_templates(&self) -> Vec<Template> {
    self.inner.get_all_templates()
  }

  fn get_all_template_ids(&self) -> TemplateIds {
    self.inner.get_all_template_ids()
  }

  async fn save_one(&self, template_id: &str, template_value: TemplateValue) -> anyhow::Result<()> {
    self
      .commit(|templates| {
        templates.insert(template_id.to_string(), template_value);
      })
      .await
  }

  async fn delete_one(&self, template_id: &str) -> anyhow::Result<()> {
    self
      .commit(|templates| {
        templates.remove(template_id);
      })
      .await
  }

  async fn edit_one(&self, template_id: &str, extensions: Vec<Extension>) -> anyhow::Result<()> {
    self
      .commit(|templates| {
        if let Some(value) = templates.get_mut(template_id) {
          value.extensions = extensions;
        }
      })
      .await
  }

  async fn rename_one(&self, template_id: &str, name: TemplateName) -> anyhow::Result<()> {
    self
      .commit(|templates| {
        if let Some(value) = templates.get_mut(template_id) {
          value.name = name;
        }
      })
      .await
  }

  async fn save_many(&self, templates: Templates) -> anyhow::Result<()> {
    self.commit(|current| current.extend(templates)).await
  }

  async fn delete_many(&self, template_ids: &TemplateIds) -> anyhow::Result<()> {
    self
      .commit(|templates| {
        for id in template_ids {
          templates.remove(id);
        }
      })
      .await
  }

  async fn replace_all(&self, templates: Templates) -> anyhow::Result<()> {
    self
      .commit(|current| {
        retain_global(current);
        current.extend(templates);
      })
      .await
  }
}
