// templar/src/queue/mod.rs

//! Defines the `StagesQueue<Err>` pipeline executor: its construction from a
//! list of step slots and its run loop.

pub mod definition;
pub mod execution;

// Re-export the main StagesQueue struct
pub use definition::StagesQueue;
