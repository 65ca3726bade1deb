//! Builder API for declaring machine definitions.
//!
//! This module provides the fluent definition builder, a serde-backed
//! configuration format for states and edges, and the `state_enum!` macro.

pub mod config;
pub mod error;
pub mod machine;
pub mod macros;

pub use config::{DefinitionConfig, OneOrMany, StateConfig, TransitionConfig};
pub use error::DefinitionError;
pub use machine::MachineDefinitionBuilder;
