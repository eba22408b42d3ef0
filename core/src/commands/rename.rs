// templar/src/commands/rename.rs

use crate::actions::{name_template, rename_one, select_templates, NameTemplateOptions};
use crate::commands::{with_handler, Command, CommandArgs, Services};
use crate::error::TemplarResult;
use crate::queue::StagesQueue;
use std::sync::Arc;

pub const ACTION: &str = "rename";

pub fn command(services: &Services) -> Command {
  with_handler(Command::new(&services.prefix, ACTION), services, on_rename)
}

async fn on_rename(command: Command, services: Services, _args: CommandArgs) -> TemplarResult<()> {
  let select = select_templates(
    &command,
    Arc::clone(&services.window),
    Arc::clone(&services.templates),
    false,
  );
  let name = name_template(
    Arc::clone(&services.window),
    Arc::clone(&services.templates),
    NameTemplateOptions::new("Rename your template", "new name"),
  );

  let queue = StagesQueue::new([
    select.slot(),
    name.slot(),
    rename_one(&command, Arc::clone(&services.window), Arc::clone(&services.templates)),
  ]);

  let result = queue.exec().await;
  select.lease.cleanup().await;
  name.lease.cleanup().await;
  result.map(|_| ())
}
