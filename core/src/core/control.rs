// templar/src/core/control.rs

//! Stage codes and the transitions a step can request.

/// Position of a stage in its queue. Negative values and values past the last
/// stage end the run.
pub type StageCode = i32;

/// The reserved "terminate" transition.
pub const EXIT_CODE: StageCode = -1;

/// How a step's answer relates to the stage that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
  /// The step returned `EXIT_CODE` (or nothing).
  Exit,
  /// Re-enter the previous stage.
  Back,
  /// Run the same stage again, typically after invalid input.
  Retry,
  /// Move on to the following stage.
  Advance,
  /// Any other target. Accepted by the run loop but never produced by a
  /// well-behaved step.
  Jump(StageCode),
}

impl Transition {
  pub fn classify(from: StageCode, to: StageCode) -> Self {
    match to {
      EXIT_CODE => Transition::Exit,
      t if t == from - 1 => Transition::Back,
      t if t == from => Transition::Retry,
      t if t == from + 1 => Transition::Advance,
      t => Transition::Jump(t),
    }
  }

  pub fn is_conventional(self) -> bool {
    !matches!(self, Transition::Jump(_))
  }
}
