//! Transitory: a declarative finite state machine core
//!
//! A machine definition declares states, one initial state, directed
//! transitions, guards and before/after callbacks. A running [`Machine`]
//! binds a subject and a storage adapter to a shared definition. The
//! machine keeps no state of its own: the current state is always the
//! `to_state` of the last persisted record, or the initial state when there
//! is no history.
//!
//! # Core Concepts
//!
//! - **State**: identifiers implementing the `State` trait, either a
//!   `state_enum!` enum or dynamic [`StateName`]s
//! - **Definition**: an immutable, shareable graph built with
//!   [`MachineDefinitionBuilder`] or seeded from a JSON config
//! - **Guards and callbacks**: scoped by a [`TransitionFilter`]
//! - **Storage**: the [`StorageAdapter`] contract, with [`MemoryAdapter`]
//!   as the bundled implementation
//! - **Checkpoints**: verified snapshots of a subject's history
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use transitory::{state_enum, Machine, MachineDefinitionBuilder, MemoryAdapter, TransitionFilter};
//!
//! state_enum! {
//!     pub enum JobState {
//!         Pending,
//!         Processing,
//!         Complete,
//!     }
//! }
//!
//! struct Job {
//!     ready: bool,
//! }
//!
//! let definition = MachineDefinitionBuilder::<JobState, Job>::new()
//!     .initial_state(JobState::Pending)?
//!     .states([JobState::Processing, JobState::Complete])
//!     .transition(JobState::Pending, [JobState::Processing])?
//!     .transition(JobState::Processing, [JobState::Complete])?
//!     .guard(TransitionFilter::to_state(JobState::Processing), |job: &Job| job.ready)?
//!     .build()?;
//!
//! let mut machine = Machine::new(Arc::new(definition), Job { ready: true }, MemoryAdapter::new());
//! assert_eq!(machine.current_state()?, JobState::Pending);
//!
//! machine.transition_to(JobState::Processing, None)?;
//! assert_eq!(machine.current_state()?, JobState::Processing);
//! assert!(!machine.can_transition_to(&JobState::Pending)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod definition;
pub mod effects;
pub mod storage;

// Re-export commonly used types
pub use builder::{DefinitionConfig, DefinitionError, MachineDefinitionBuilder};
pub use checkpoint::{Checkpoint, CheckpointError};
pub use core::{
    Callback, CallbackError, Guard, GuardError, Metadata, State, StateName, TransitionContext,
    TransitionFilter, TransitionHistory, TransitionRecord,
};
pub use definition::MachineDefinition;
pub use effects::{Machine, TransitionError, TransitionOutcome};
pub use storage::{MemoryAdapter, StorageAdapter, StorageError};
