// src/lib.rs

//! Templar: named templates of editor extensions, managed through resumable,
//! user-navigable wizards.
//!
//! The engine underneath is a staged pipeline:
//!  - A `StagesQueue` runs an ordered list of async steps, one at a time.
//!  - Each step answers with the code of the stage to run next: exit, previous,
//!    current (retry) or next.
//!  - Steps share a per-run `ContextStore` of typed answers.
//!  - Skipped steps are dropped before positions are assigned.
//!
//! On top of it sit the template commands (apply, create, clone, edit, rename,
//! delete, export, import, editGlobal) and a name-keyed `CommandRegistry`.

pub mod actions;
pub mod app;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod queue;
pub mod registry;
pub mod telemetry;
pub mod templates;
pub mod ui;

// --- Re-exports for the Public API ---

pub use crate::core::context::{ContextKey, ContextPatch, ContextSnapshot, ContextStore};
pub use crate::core::control::{StageCode, Transition, EXIT_CODE};
pub use crate::core::stage::{QueueManager, Stage};
pub use crate::core::step::{step_fn, StepFn, StepFuture, StepSlot};

pub use crate::queue::StagesQueue;

pub use crate::app::Templar;
pub use crate::commands::{Command, CommandArgs, CommandPrefix, Services};
pub use crate::config::AppConfig;
pub use crate::error::{TemplarError, TemplarResult};
pub use crate::registry::CommandRegistry;
