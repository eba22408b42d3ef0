// templar/src/config.rs

use crate::commands::{CommandPrefix, DEFAULT_COMMAND_PREFIX};
use crate::error::{TemplarError, TemplarResult};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

pub const TEMPLATES_FILE_NAME: &str = "templates.json";
pub const WORKSPACE_FILE_NAME: &str = "workspace.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
  pub command_prefix: CommandPrefix,
  /// Directory scanned for installed extensions.
  pub extensions_dir: PathBuf,
  /// Directory holding the template store and the workspace state.
  pub data_dir: PathBuf,
  /// Default log filter when `RUST_LOG` is not set.
  pub log_filter: String,
}

impl AppConfig {
  /// Reads `TEMPLAR_*` variables, after loading a `.env` file if present.
  pub fn from_env() -> TemplarResult<Self> {
    dotenv().ok();

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| TemplarError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let command_prefix = get_env("TEMPLAR_COMMAND_PREFIX").unwrap_or_else(|_| DEFAULT_COMMAND_PREFIX.to_string());
    if command_prefix.trim().is_empty() || command_prefix.contains(char::is_whitespace) {
      return Err(TemplarError::Config(format!(
        "Invalid TEMPLAR_COMMAND_PREFIX: '{}'",
        command_prefix
      )));
    }

    let extensions_dir = match get_env("TEMPLAR_EXTENSIONS_DIR") {
      Ok(dir) => PathBuf::from(dir),
      Err(_) => home_dir()?.join(".vscode").join("extensions"),
    };
    let data_dir = match get_env("TEMPLAR_DATA_DIR") {
      Ok(dir) => PathBuf::from(dir),
      Err(_) => home_dir()?.join(".config").join("templar"),
    };
    let log_filter = get_env("TEMPLAR_LOG").unwrap_or_else(|_| "info".to_string());

    tracing::debug!(
      prefix = %command_prefix,
      extensions_dir = %extensions_dir.display(),
      data_dir = %data_dir.display(),
      "Application configuration loaded."
    );

    Ok(Self {
      command_prefix: CommandPrefix::new(command_prefix),
      extensions_dir,
      data_dir,
      log_filter,
    })
  }

  pub fn templates_path(&self) -> PathBuf {
    self.data_dir.join(TEMPLATES_FILE_NAME)
  }

  pub fn workspace_path(&self) -> PathBuf {
    self.data_dir.join(WORKSPACE_FILE_NAME)
  }
}

fn home_dir() -> TemplarResult<PathBuf> {
  let var_name = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
  env::var_os(var_name)
    .filter(|home| !home.is_empty())
    .map(PathBuf::from)
    .ok_or_else(|| TemplarError::Config(format!("Missing environment variable '{}'", var_name)))
}
