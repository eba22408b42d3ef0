// templar/src/templates/types.rs

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub type TemplateId = String;
pub type TemplateIds = BTreeSet<TemplateId>;
pub type TemplateName = String;
pub type TemplateNames = BTreeSet<TemplateName>;
pub type ExtensionIds = BTreeSet<String>;

/// Reserved id of the template whose extensions are enabled in every workspace.
/// It never shows up in template listings.
pub const GLOBAL_TEMPLATE_ID: &str = "__global__";
pub const GLOBAL_TEMPLATE_NAME: &str = "Global";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension {
  pub id: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub uuid: Option<String>,
}

impl Extension {
  pub fn new(id: impl Into<String>) -> Self {
    Self { id: id.into(), uuid: None }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateValue {
  pub name: TemplateName,
  pub extensions: Vec<Extension>,
}

impl TemplateValue {
  /// Sentinel returned for templates that do not exist.
  pub fn empty() -> Self {
    Self::default()
  }

  pub fn is_empty(&self) -> bool {
    self.name.is_empty()
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
  pub id: TemplateId,
  pub name: TemplateName,
  pub extensions: Vec<Extension>,
}

impl Template {
  pub fn from_value(id: TemplateId, value: TemplateValue) -> Self {
    Self {
      id,
      name: value.name,
      extensions: value.extensions,
    }
  }
}

pub type Templates = BTreeMap<TemplateId, TemplateValue>;

/// Import/export file format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedData {
  pub templates: Templates,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestMetadata {
  pub id: String,
}

/// The parts of an installed extension's `package.json` we care about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionManifest {
  pub name: String,
  pub publisher: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub display_name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(rename = "__metadata", default, skip_serializing_if = "Option::is_none")]
  pub metadata: Option<ManifestMetadata>,
}

impl ExtensionManifest {
  /// `publisher.name`, lowercased.
  pub fn extension_id(&self) -> String {
    format!("{}.{}", self.publisher.to_lowercase(), self.name.to_lowercase())
  }

  pub fn to_extension(&self) -> Extension {
    Extension {
      id: self.extension_id(),
      uuid: self.metadata.as_ref().map(|m| m.id.clone()),
    }
  }

  pub fn label(&self) -> &str {
    self.display_name.as_deref().unwrap_or(&self.name)
  }
}

pub fn extension_ids(extensions: &[Extension]) -> ExtensionIds {
  extensions.iter().map(|e| e.id.clone()).collect()
}
