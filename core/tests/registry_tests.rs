// tests/registry_tests.rs
mod common;

use common::*;
use serial_test::serial;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use templar::commands::{apply, edit_global};
use templar::{Command, CommandArgs, CommandPrefix, CommandRegistry, TemplarError};

fn counting_command(prefix: &CommandPrefix, action: &str, calls: &Arc<AtomicUsize>) -> Command {
  let mut command = Command::new(prefix, action);
  let calls = Arc::clone(calls);
  command.set_on_execute(move |_args| {
    let calls = Arc::clone(&calls);
    async move {
      calls.fetch_add(1, Ordering::SeqCst);
      Ok::<(), TemplarError>(())
    }
  });
  command
}

#[tokio::test]
#[serial]
async fn test_activation_registers_every_command_under_the_prefix() {
  setup_tracing();
  let harness = Harness::new(two_templates());

  let expected: Vec<String> = {
    let mut names: Vec<String> = [
      "apply", "clone", "create", "delete", "edit", "editGlobal", "export", "import", "rename",
    ]
    .iter()
    .map(|action| command_name(action))
    .collect();
    names.sort();
    names
  };
  assert_eq!(harness.app.command_names(), expected);
  assert_eq!(harness.app.registry().len(), 9);
  assert_eq!(
    harness.app.registry().get(&command_name(edit_global::ACTION)).unwrap().action_name(),
    "editGlobal"
  );
}

#[tokio::test]
#[serial]
async fn test_unknown_command_is_reported() {
  setup_tracing();
  let harness = Harness::new(two_templates());

  let result = harness.app.execute("other.apply", CommandArgs::none()).await;
  match result {
    Err(TemplarError::CommandNotFound { name }) => assert_eq!(name, "other.apply"),
    other => panic!("Expected CommandNotFound, got {:?}", other),
  }
}

#[tokio::test]
#[serial]
async fn test_dispatch_swallows_failures() {
  setup_tracing();
  let registry = CommandRegistry::new();
  let mut failing = Command::new(&CommandPrefix::default(), "apply");
  failing.set_on_execute(|_args| async { Err::<(), _>(TemplarError::Internal("boom".to_string())) });
  registry.register(failing);

  let name = CommandPrefix::default().qualify("apply");
  assert!(registry.execute(&name, CommandArgs::none()).await.is_err());
  registry.dispatch(&name, CommandArgs::none()).await;
  registry.dispatch("missing", CommandArgs::none()).await;
}

#[tokio::test]
#[serial]
async fn test_registering_twice_replaces_the_handler() {
  setup_tracing();
  let prefix = CommandPrefix::new("x");
  let first = Arc::new(AtomicUsize::new(0));
  let second = Arc::new(AtomicUsize::new(0));
  let registry = CommandRegistry::default();

  registry.register(counting_command(&prefix, "apply", &first));
  registry.register(counting_command(&prefix, "apply", &second));
  assert_eq!(registry.len(), 1);

  registry.execute("x.apply", CommandArgs::none()).await.unwrap();
  assert_eq!(first.load(Ordering::SeqCst), 0);
  assert_eq!(second.load(Ordering::SeqCst), 1);
}

#[tokio::test]
#[serial]
async fn test_command_without_handler_is_a_no_op() {
  setup_tracing();
  let registry = CommandRegistry::new();
  let command = Command::new(&CommandPrefix::default(), "export");
  assert!(!command.has_handler());
  registry.register(command);

  let name = CommandPrefix::default().qualify("export");
  assert!(registry.execute(&name, CommandArgs::none()).await.is_ok());
}

#[tokio::test]
#[serial]
async fn test_dispatch_runs_a_full_command() {
  setup_tracing();
  let harness = Harness::new(two_templates());
  harness
    .app
    .dispatch(&command_name(apply::ACTION), CommandArgs::none().with_template_id("t-rust"))
    .await;
  assert_eq!(harness.workspace.applied().unwrap().template_id, "t-rust");
}

#[tokio::test]
#[serial]
async fn test_collaborator_failures_surface_as_handler_errors() {
  setup_tracing();
  let registry = CommandRegistry::new();
  let mut failing = Command::new(&CommandPrefix::default(), "import");
  failing.set_on_execute(|_args| async {
    Err::<(), TemplarError>(anyhow::anyhow!("disk full").into())
  });
  registry.register(failing);

  let result = registry.execute(&CommandPrefix::default().qualify("import"), CommandArgs::none()).await;
  match result {
    Err(TemplarError::Handler { source }) => assert_eq!(source.to_string(), "disk full"),
    other => panic!("Expected Handler error, got {:?}", other),
  }
}
