// templar/src/commands/command.rs

//! The `Command` descriptor: a stable action name, the host-facing invocation
//! name built from the configured prefix, and the handler run on invocation.

use crate::error::TemplarResult;
use crate::templates::types::TemplateId;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{event, instrument, Level};

pub const DEFAULT_COMMAND_PREFIX: &str = "extension-templates";

/// Future returned by a command handler.
pub type CommandFuture = Pin<Box<dyn Future<Output = TemplarResult<()>> + Send>>;

/// Type alias for a command handler.
pub type CommandHandler = Arc<dyn Fn(CommandArgs) -> CommandFuture + Send + Sync>;

/// Namespace of every invocation name, e.g. `extension-templates.apply`.
/// Read from configuration once and handed to whatever builds commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPrefix(String);

impl CommandPrefix {
  pub fn new(prefix: impl Into<String>) -> Self {
    Self(prefix.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn qualify(&self, action_name: &str) -> String {
    format!("{}.{}", self.0, action_name)
  }
}

impl Default for CommandPrefix {
  fn default() -> Self {
    Self::new(DEFAULT_COMMAND_PREFIX)
  }
}

impl fmt::Display for CommandPrefix {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Arguments a command may be invoked with. Commands ignore what they do not
/// use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandArgs {
  /// Skips template selection when set (and not empty).
  pub template_id: Option<TemplateId>,
  /// Replaces the command's success message.
  pub message: Option<String>,
}

impl CommandArgs {
  pub fn none() -> Self {
    Self::default()
  }

  pub fn with_template_id(mut self, template_id: impl Into<TemplateId>) -> Self {
    self.template_id = Some(template_id.into());
    self
  }

  pub fn with_message(mut self, message: impl Into<String>) -> Self {
    self.message = Some(message.into());
    self
  }

  /// The template id, with an empty id counting as absent.
  pub fn given_template_id(&self) -> Option<&TemplateId> {
    self.template_id.as_ref().filter(|id| !id.is_empty())
  }
}

#[derive(Clone)]
pub struct Command {
  action_name: String,
  name: String,
  on_execute: Option<CommandHandler>,
}

impl Command {
  pub fn new(prefix: &CommandPrefix, action_name: impl Into<String>) -> Self {
    let action_name = action_name.into();
    Self {
      name: prefix.qualify(&action_name),
      action_name,
      on_execute: None,
    }
  }

  /// The namespaced invocation name.
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn action_name(&self) -> &str {
    &self.action_name
  }

  /// The action name with its first letter upper-cased, for messages.
  pub fn capitalized_action_name(&self) -> String {
    let mut chars = self.action_name.chars();
    match chars.next() {
      Some(first) => first.to_uppercase().chain(chars).collect(),
      None => String::new(),
    }
  }

  pub fn set_on_execute<F, Fut>(&mut self, handler: F)
  where
    F: Fn(CommandArgs) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = TemplarResult<()>> + Send + 'static,
  {
    let wrapped: CommandHandler = Arc::new(move |args: CommandArgs| -> CommandFuture { Box::pin(handler(args)) });
    self.on_execute = Some(wrapped);
  }

  /// The handler, or a no-op when none was set.
  pub fn on_execute(&self) -> CommandHandler {
    match &self.on_execute {
      Some(handler) => Arc::clone(handler),
      None => Arc::new(|_args: CommandArgs| -> CommandFuture { Box::pin(async { Ok(()) }) }),
    }
  }

  pub fn has_handler(&self) -> bool {
    self.on_execute.is_some()
  }

  #[instrument(name = "Command::execute", skip_all, fields(command = %self.name), err(Display))]
  pub async fn execute(&self, args: CommandArgs) -> TemplarResult<()> {
    event!(Level::DEBUG, ?args, "Command invoked.");
    (self.on_execute())(args).await
  }
}

impl fmt::Debug for Command {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Command")
      .field("name", &self.name)
      .field("has_handler", &self.on_execute.is_some())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn names_are_prefixed_and_capitalized() {
    let command = Command::new(&CommandPrefix::new("my-ext"), "editGlobal");
    assert_eq!(command.name(), "my-ext.editGlobal");
    assert_eq!(command.action_name(), "editGlobal");
    assert_eq!(command.capitalized_action_name(), "EditGlobal");

    let default = Command::new(&CommandPrefix::default(), "apply");
    assert_eq!(default.name(), "extension-templates.apply");
  }

  #[test]
  fn empty_template_id_counts_as_absent() {
    assert_eq!(CommandArgs::none().with_template_id("").given_template_id(), None);
    assert_eq!(
      CommandArgs::none().with_template_id("t1").given_template_id().map(String::as_str),
      Some("t1")
    );
  }

  #[tokio::test]
  async fn default_handler_is_a_no_op() {
    let command = Command::new(&CommandPrefix::default(), "noop");
    assert!(!command.has_handler());
    command.execute(CommandArgs::none()).await.unwrap();
  }
}
