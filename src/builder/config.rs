//! Serializable machine definition configuration.
//!
//! States and edges can be loaded from JSON:
//!
//! ```json
//! {
//!   "states": [
//!     {"name": "pending", "initial": true},
//!     {"name": "processing"},
//!     {"name": "complete"}
//!   ],
//!   "transitions": [
//!     {"from": "pending", "to": "processing"},
//!     {"from": "processing", "to": ["complete", "pending"]}
//!   ]
//! }
//! ```
//!
//! Guards and callbacks are code, so they are added to the builder returned
//! by [`MachineDefinitionBuilder::from_config`](crate::builder::MachineDefinitionBuilder::from_config).

use crate::core::State;
use serde::{Deserialize, Serialize};

/// States and edges of a machine definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct DefinitionConfig<S: State> {
    /// Declared states, in order.
    pub states: Vec<StateConfig<S>>,

    /// Declared edges, in order.
    #[serde(default)]
    pub transitions: Vec<TransitionConfig<S>>,
}

/// One declared state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateConfig<S: State> {
    pub name: S,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub initial: bool,
}

/// Edges from one source state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionConfig<S: State> {
    pub from: S,
    pub to: OneOrMany<S>,
}

/// A single target state or a list of them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged, bound = "")]
pub enum OneOrMany<S: State> {
    One(S),
    Many(Vec<S>),
}

impl<S: State> OneOrMany<S> {
    pub fn to_vec(&self) -> Vec<S> {
        match self {
            OneOrMany::One(state) => vec![state.clone()],
            OneOrMany::Many(states) => states.clone(),
        }
    }
}

impl<S: State> DefinitionConfig<S> {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StateName;

    const CONFIG: &str = r#"{
        "states": [
            {"name": "pending", "initial": true},
            {"name": "processing"},
            {"name": "complete"}
        ],
        "transitions": [
            {"from": "pending", "to": "processing"},
            {"from": "processing", "to": ["complete", "pending"]}
        ]
    }"#;

    #[test]
    fn parses_single_and_list_targets() {
        let config: DefinitionConfig<StateName> = DefinitionConfig::from_json(CONFIG).unwrap();

        assert_eq!(config.states.len(), 3);
        assert!(config.states[0].initial);
        assert!(!config.states[1].initial);
        assert_eq!(config.transitions[0].to.to_vec(), vec![StateName::from("processing")]);
        assert_eq!(
            config.transitions[1].to.to_vec(),
            vec![StateName::from("complete"), StateName::from("pending")]
        );
    }

    #[test]
    fn transitions_default_to_empty() {
        let config: DefinitionConfig<StateName> =
            DefinitionConfig::from_json(r#"{"states": [{"name": "only", "initial": true}]}"#).unwrap();
        assert!(config.transitions.is_empty());
    }

    #[test]
    fn config_serializes_back_to_json() {
        let config: DefinitionConfig<StateName> = DefinitionConfig::from_json(CONFIG).unwrap();
        let json = serde_json::to_value(&config).unwrap();

        assert_eq!(json["states"][0]["initial"], serde_json::json!(true));
        assert!(json["states"][1].get("initial").is_none());
        assert_eq!(json["transitions"][0]["to"], serde_json::json!("processing"));
    }
}
