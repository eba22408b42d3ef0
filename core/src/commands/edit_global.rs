// templar/src/commands/edit_global.rs

//! `editGlobal`: picks the extensions enabled in every workspace.

use crate::actions::keys::TEMPLATE_ID;
use crate::actions::{edit_global, select_extensions};
use crate::commands::{with_handler, Command, CommandArgs, Services};
use crate::core::context::ContextPatch;
use crate::error::TemplarResult;
use crate::queue::StagesQueue;
use crate::templates::types::GLOBAL_TEMPLATE_ID;
use std::sync::Arc;

pub const ACTION: &str = "editGlobal";

pub fn command(services: &Services) -> Command {
  with_handler(Command::new(&services.prefix, ACTION), services, on_edit_global)
}

async fn on_edit_global(command: Command, services: Services, _args: CommandArgs) -> TemplarResult<()> {
  let select = select_extensions(
    &command,
    Arc::clone(&services.window),
    Arc::clone(&services.templates),
    Arc::clone(&services.catalog),
    false,
  );

  let queue = StagesQueue::new([
    select.slot(),
    edit_global(Arc::clone(&services.window), Arc::clone(&services.templates)),
  ]);
  queue.set_storages(ContextPatch::new().set(TEMPLATE_ID, GLOBAL_TEMPLATE_ID.to_string()));

  let result = queue.exec().await;
  select.lease.cleanup().await;
  result.map(|_| ())
}
