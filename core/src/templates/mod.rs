// templar/src/templates/mod.rs

//! The template domain: what a template is, where templates are kept, which
//! extensions are installed, and how imported template files are validated.

pub mod catalog;
pub mod store;
pub mod types;
pub mod validate;
pub mod workspace;

pub use catalog::{DirectoryExtensionCatalog, ExtensionCatalog};
pub use store::{JsonFileTemplateStore, MemoryTemplateStore, SplitExtensions, TemplateStore};
pub use types::{
  extension_ids, ExportedData, Extension, ExtensionIds, ExtensionManifest, Template, TemplateId, TemplateIds,
  TemplateName, TemplateNames, TemplateValue, Templates, GLOBAL_TEMPLATE_ID, GLOBAL_TEMPLATE_NAME,
};
pub use validate::validate_exported_data;
pub use workspace::{ApplyTemplate, JsonFileWorkspaceStore, MemoryWorkspaceStore, WorkspaceStore};
