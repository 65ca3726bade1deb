//! Core state machine types.
//!
//! This module contains the building blocks shared by definitions and
//! running machines:
//! - State identifiers via the `State` trait
//! - Transition filters and the context passed to guards and callbacks
//! - Guards and before/after callbacks
//! - Transition records and history

mod callback;
mod filter;
mod guard;
mod history;
mod state;

pub use callback::{Callback, CallbackAction, CallbackError};
pub use filter::{TransitionContext, TransitionFilter};
pub use guard::{BoxError, Guard, GuardCheck, GuardError};
pub use history::{Metadata, TransitionHistory, TransitionRecord};
pub use state::{State, StateName};
