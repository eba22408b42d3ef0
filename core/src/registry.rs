// templar/src/registry.rs

//! Defines `CommandRegistry`, the name-keyed registry the host dispatches
//! command invocations through.

use crate::commands::{Command, CommandArgs};
use crate::error::{TemplarError, TemplarResult};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{event, instrument, Level};

pub struct CommandRegistry {
  commands: Mutex<HashMap<String, Arc<Command>>>,
}

impl CommandRegistry {
  /// Creates a new, empty registry.
  pub fn new() -> Self {
    Self {
      commands: Mutex::new(HashMap::new()),
    }
  }

  /// Registers `command` under its invocation name, replacing any command
  /// already registered under that name.
  pub fn register(&self, command: Command) {
    event!(Level::DEBUG, command = %command.name(), "Registering command.");
    let previous = self
      .commands
      .lock()
      .insert(command.name().to_string(), Arc::new(command));
    if let Some(previous) = previous {
      event!(Level::WARN, command = %previous.name(), "Command registered twice; the earlier one was replaced.");
    }
  }

  /// Invocation names of every registered command, sorted.
  pub fn names(&self) -> Vec<String> {
    let mut names: Vec<String> = self.commands.lock().keys().cloned().collect();
    names.sort();
    names
  }

  pub fn get(&self, name: &str) -> Option<Arc<Command>> {
    self.commands.lock().get(name).cloned()
  }

  pub fn len(&self) -> usize {
    self.commands.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.commands.lock().is_empty()
  }

  /// Runs the command registered as `name` and waits for it to finish. Used
  /// to chain commands from inside a step.
  #[instrument(name = "CommandRegistry::execute", skip(self, args), err(Display))]
  pub async fn execute(&self, name: &str, args: CommandArgs) -> TemplarResult<()> {
    // The lock is released before the command runs, so it may chain others.
    let command = self.get(name).ok_or_else(|| {
      event!(Level::ERROR, "No command registered under this name.");
      TemplarError::CommandNotFound { name: name.to_string() }
    })?;
    command.execute(args).await
  }

  /// Host entry point: runs the command and logs a failure instead of
  /// returning it. Users learn about failures through notifications.
  pub async fn dispatch(&self, name: &str, args: CommandArgs) {
    if let Err(e) = self.execute(name, args).await {
      event!(Level::ERROR, command = %name, error = %e, "Command invocation failed.");
    }
  }
}

impl Default for CommandRegistry {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Debug for CommandRegistry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CommandRegistry").field("commands", &self.names()).finish()
  }
}
