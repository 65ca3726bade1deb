//! Running machines: validation, callbacks and persistence for one subject.
//!
//! # Key Concepts
//!
//! - **Machine**: binds a subject and a storage adapter to a shared
//!   definition and executes transitions for it
//! - **TransitionError**: every way a transition can fail, by kind
//! - **TransitionOutcome**: the non-raising view of the same failures
//!
//! A transition runs guards, then the edge check, then before-callbacks,
//! then the storage append, then after-callbacks. Only the append is
//! durable, and a failing after-callback does not undo it.

mod machine;
mod transition;

pub use machine::Machine;
pub use transition::{TransitionError, TransitionOutcome};
