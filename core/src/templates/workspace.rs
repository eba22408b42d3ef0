// templar/src/templates/workspace.rs

//! Per-workspace state: which template is applied and the resulting
//! enabled/disabled extension lists.

use crate::templates::types::{Extension, TemplateId};
use anyhow::Context as AnyhowContext;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{event, instrument, Level};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyTemplate {
  #[serde(rename = "templateId")]
  pub template_id: TemplateId,
  #[serde(rename = "extensionsIdentifiers/enabled")]
  pub enabled: Vec<Extension>,
  #[serde(rename = "extensionsIdentifiers/disabled")]
  pub disabled: Vec<Extension>,
}

#[async_trait]
pub trait WorkspaceStore: Send + Sync {
  fn applied_template_id(&self) -> Option<TemplateId>;

  async fn apply_template(&self, apply: ApplyTemplate) -> anyhow::Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryWorkspaceStore {
  state: RwLock<Option<ApplyTemplate>>,
}

impl MemoryWorkspaceStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn applied(&self) -> Option<ApplyTemplate> {
    self.state.read().clone()
  }
}

#[async_trait]
impl WorkspaceStore for MemoryWorkspaceStore {
  fn applied_template_id(&self) -> Option<TemplateId> {
    self.state.read().as_ref().map(|s| s.template_id.clone())
  }

  async fn apply_template(&self, apply: ApplyTemplate) -> anyhow::Result<()> {
    *self.state.write() = Some(apply);
    Ok(())
  }
}

/// Workspace state kept in a JSON file next to the workspace.
#[derive(Debug)]
pub struct JsonFileWorkspaceStore {
  path: PathBuf,
  inner: MemoryWorkspaceStore,
}

impl JsonFileWorkspaceStore {
  #[instrument(name = "JsonFileWorkspaceStore::open", skip_all)]
  pub async fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
    let path = path.into();
    let state = match tokio::fs::read_to_string(&path).await {
      Ok(text) => Some(
        serde_json::from_str::<ApplyTemplate>(&text)
          .with_context(|| format!("Can not parse workspace state {}", path.display()))?,
      ),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
      Err(e) => return Err(e).with_context(|| format!("Can not read workspace state {}", path.display())),
    };
    event!(Level::DEBUG, path = %path.display(), has_state = state.is_some(), "Workspace state loaded.");

    Ok(Self {
      path,
      inner: MemoryWorkspaceStore {
        state: RwLock::new(state),
      },
    })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

#[async_trait]
impl WorkspaceStore for JsonFileWorkspaceStore {
  fn applied_template_id(&self) -> Option<TemplateId> {
    self.inner.applied_template_id()
  }

  async fn apply_template(&self, apply: ApplyTemplate) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(&apply)?;
    if let Some(parent) = self.path.parent() {
      tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&self.path, text)
      .await
      .with_context(|| format!("Can not write workspace state {}", self.path.display()))?;
    self.inner.apply_template(apply).await
  }
}
