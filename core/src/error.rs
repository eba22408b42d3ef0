// templar/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplarError {
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Command not found: {name}")]
  CommandNotFound { name: String },

  #[error("Malformed data: {}", errors.join("; "))]
  MalformedData { errors: Vec<String> },

  #[error("Error in a step or external operation. Source: {source}")]
  Handler {
    #[source]
    source: AnyhowError,
  },

  #[error("Internal templar error: {0}")]
  Internal(String),
}

// Collaborators (stores, catalogs, host calls) report failures as anyhow errors.
impl From<AnyhowError> for TemplarError {
  fn from(err: AnyhowError) -> Self {
    TemplarError::Handler { source: err }
  }
}

pub type TemplarResult<T, E = TemplarError> = std::result::Result<T, E>;
