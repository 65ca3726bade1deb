//! Core State trait for state machine states.
//!
//! Every state identifier a machine declares implements this trait. States
//! are plain values: they are compared, cloned into transition records and
//! serialized alongside them.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display};

/// Trait for state machine states.
///
/// # Required Traits
///
/// - `Clone`: States are copied into transition records and contexts
/// - `PartialEq`: Transition edges and filters match states by equality
/// - `Debug`: States must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: Records and definitions are serializable
/// - `Send` + `Sync`: A built definition is shared across threads
///
/// # Example
///
/// ```rust
/// use transitory::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum OrderState {
///     Pending,
///     Shipped,
/// }
///
/// impl State for OrderState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Pending => "Pending",
///             Self::Shipped => "Shipped",
///         }
///     }
/// }
///
/// assert_eq!(OrderState::Shipped.name(), "Shipped");
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;
}

/// A state identified by its name alone.
///
/// Useful when the set of states comes from configuration rather than from
/// a Rust enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateName(String);

impl StateName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl State for StateName {
    fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StateName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for StateName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for StateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
