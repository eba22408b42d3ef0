// templar/src/actions/mod.rs

//! Reusable wizard steps. Widget-backed steps come as `Materials`: the step
//! plus the lease of the widget it drives, which the command releases once its
//! invocation is over.

pub mod extensions;
pub mod keys;
pub mod storage;
pub mod templates;

use crate::core::step::{StepFn, StepSlot};
use crate::error::TemplarError;
use crate::ui::WidgetLease;
use std::fmt;

pub use extensions::select_extensions;
pub use storage::{delete_many, edit_global, edit_one, rename_one, save_many, save_one};
pub use templates::{name_template, select_templates, NameTemplateOptions};

/// A step and the lease of the widget it shows.
pub struct Materials {
  pub step: StepFn<TemplarError>,
  pub lease: WidgetLease,
}

impl Materials {
  /// The step as a queue entry. Slots share the step, so one widget can serve
  /// several runs of the same invocation.
  pub fn slot(&self) -> StepSlot<TemplarError> {
    StepSlot::Step(self.step.clone())
  }

  /// `Skipped` when `skip` holds; the lease is unaffected.
  pub fn slot_unless(&self, skip: bool) -> StepSlot<TemplarError> {
    StepSlot::unless(skip, self.slot())
  }
}

impl fmt::Debug for Materials {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Materials").field("lease", &self.lease).finish_non_exhaustive()
  }
}
