// templar/src/commands/mod.rs

//! The template commands. Each module builds one `Command` whose handler
//! assembles a fresh `StagesQueue` per invocation and releases its widgets
//! when the run is over.

pub mod apply;
pub mod clone;
pub mod command;
pub mod create;
pub mod delete;
pub mod edit;
pub mod edit_global;
pub mod export;
pub mod import;
pub mod rename;

use crate::error::{TemplarError, TemplarResult};
use crate::registry::CommandRegistry;
use crate::templates::catalog::ExtensionCatalog;
use crate::templates::store::TemplateStore;
use crate::templates::workspace::WorkspaceStore;
use crate::ui::Window;
use std::fmt;
use std::sync::{Arc, Weak};

pub use command::{Command, CommandArgs, CommandFuture, CommandHandler, CommandPrefix, DEFAULT_COMMAND_PREFIX};

/// Everything a command needs at invocation time.
#[derive(Clone)]
pub struct Services {
  pub prefix: CommandPrefix,
  pub window: Arc<dyn Window>,
  pub templates: Arc<dyn TemplateStore>,
  pub workspace: Arc<dyn WorkspaceStore>,
  pub catalog: Arc<dyn ExtensionCatalog>,
  /// Commands live inside the registry, so they only hold it weakly.
  pub registry: Weak<CommandRegistry>,
}

impl Services {
  /// Runs another command and waits for it to finish.
  pub async fn chain(&self, action_name: &str, args: CommandArgs) -> TemplarResult<()> {
    let registry = self
      .registry
      .upgrade()
      .ok_or_else(|| TemplarError::Internal("command registry was dropped".to_string()))?;
    registry.execute(&self.prefix.qualify(action_name), args).await
  }
}

impl fmt::Debug for Services {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Services").field("prefix", &self.prefix).finish_non_exhaustive()
  }
}

/// Builds all nine commands.
pub fn all_commands(services: &Services) -> Vec<Command> {
  vec![
    apply::command(services),
    create::command(services),
    clone::command(services),
    edit::command(services),
    rename::command(services),
    delete::command(services),
    export::command(services),
    import::command(services),
    edit_global::command(services),
  ]
}

/// Attaches a handler taking the command descriptor and the services.
pub(crate) fn with_handler<F, Fut>(mut command: Command, services: &Services, handler: F) -> Command
where
  F: Fn(Command, Services, CommandArgs) -> Fut + Send + Sync + 'static,
  Fut: std::future::Future<Output = TemplarResult<()>> + Send + 'static,
{
  let descriptor = command.clone();
  let services = services.clone();
  command.set_on_execute(move |args| handler(descriptor.clone(), services.clone(), args));
  command
}
