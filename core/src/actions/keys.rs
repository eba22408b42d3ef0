// templar/src/actions/keys.rs

//! Context keys shared by the template wizards.

use crate::core::context::ContextKey;
use crate::templates::types::{Extension, TemplateId, TemplateIds, TemplateName, Templates};
use std::path::PathBuf;
use std::sync::Arc;

/// Decides, from `has_change_stage`, whether a template list shown again must
/// be reloaded from the store.
pub type ReassignPolicy = Arc<dyn Fn(bool) -> bool + Send + Sync>;

pub const TEMPLATE_ID: ContextKey<TemplateId> = ContextKey::new("templateId");
pub const TEMPLATE_IDS: ContextKey<TemplateIds> = ContextKey::new("templateIds");
pub const TEMPLATE_NAME: ContextKey<TemplateName> = ContextKey::new("templateName");
pub const TEMPLATE_EXTENSIONS: ContextKey<Vec<Extension>> = ContextKey::new("templateExtensions");
pub const APPLY_GLOBAL_TEMPLATE: ContextKey<bool> = ContextKey::new("applyGlobalTemplate");
pub const NEED_REASSIGN: ContextKey<ReassignPolicy> = ContextKey::new("needReassign");
pub const SELECTED_PATH: ContextKey<PathBuf> = ContextKey::new("selectedPath");
pub const SELECTED_FILE: ContextKey<PathBuf> = ContextKey::new("selectedFile");
pub const TEMPLATES: ContextKey<Templates> = ContextKey::new("templates");

pub fn always_reassign() -> ReassignPolicy {
  Arc::new(|_| true)
}
