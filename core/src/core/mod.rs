// templar/src/core/mod.rs

//! Engine building blocks: the context store, stage codes, the stage handle and
//! the step contract.

pub mod context;
pub mod control;
pub mod stage;
pub mod step;

pub use context::{ContextKey, ContextPatch, ContextSnapshot, ContextStore};
pub use control::{StageCode, Transition, EXIT_CODE};
pub use stage::{QueueManager, Stage};
pub use step::{step_fn, StepFn, StepFuture, StepSlot};
