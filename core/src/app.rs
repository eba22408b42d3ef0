// templar/src/app.rs

//! Wiring: builds the command registry over a host window and the template,
//! workspace and extension sources.

use crate::commands::{all_commands, CommandArgs, Services};
use crate::config::AppConfig;
use crate::error::TemplarResult;
use crate::registry::CommandRegistry;
use crate::templates::catalog::{DirectoryExtensionCatalog, ExtensionCatalog};
use crate::templates::store::{JsonFileTemplateStore, TemplateStore};
use crate::templates::workspace::{JsonFileWorkspaceStore, WorkspaceStore};
use crate::ui::Window;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// An activated set of template commands.
#[derive(Debug, Clone)]
pub struct Templar {
  registry: Arc<CommandRegistry>,
}

impl Templar {
  /// Registers all nine commands over the given collaborators.
  pub fn activate(
    config: &AppConfig,
    window: Arc<dyn Window>,
    catalog: Arc<dyn ExtensionCatalog>,
    templates: Arc<dyn TemplateStore>,
    workspace: Arc<dyn WorkspaceStore>,
  ) -> Self {
    let registry = Arc::new_cyclic(|registry| {
      let services = Services {
        prefix: config.command_prefix.clone(),
        window,
        templates,
        workspace,
        catalog,
        registry: registry.clone(),
      };
      let commands = CommandRegistry::new();
      for command in all_commands(&services) {
        commands.register(command);
      }
      commands
    });
    event!(Level::INFO, commands = registry.len(), prefix = %config.command_prefix, "Template commands activated.");
    Self { registry }
  }

  /// Activates with the file-backed stores and the extensions directory named
  /// by `config`.
  #[instrument(name = "Templar::open", skip_all, err(Display))]
  pub async fn open(config: &AppConfig, window: Arc<dyn Window>) -> TemplarResult<Self> {
    let templates = JsonFileTemplateStore::open(config.templates_path()).await?;
    let workspace = JsonFileWorkspaceStore::open(config.workspace_path()).await?;
    let catalog = DirectoryExtensionCatalog::new(&config.extensions_dir);
    Ok(Self::activate(
      config,
      window,
      Arc::new(catalog),
      Arc::new(templates),
      Arc::new(workspace),
    ))
  }

  pub fn registry(&self) -> &Arc<CommandRegistry> {
    &self.registry
  }

  /// Invocation names to register with the host.
  pub fn command_names(&self) -> Vec<String> {
    self.registry.names()
  }

  pub async fn execute(&self, name: &str, args: CommandArgs) -> TemplarResult<()> {
    self.registry.execute(name, args).await
  }

  pub async fn dispatch(&self, name: &str, args: CommandArgs) {
    self.registry.dispatch(name, args).await
  }
}
