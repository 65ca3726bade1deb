//! Transition records and history.
//!
//! A record is the persisted fact that a subject moved to a state. Records
//! are created by a storage adapter and are never mutated afterwards; the
//! current state of a subject is always derived from the last one.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Opaque key/value metadata attached to a transition.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// An immutable, timestamped fact that a subject entered `to_state`.
///
/// # Example
///
/// ```rust
/// use transitory::core::{StateName, TransitionRecord};
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     to_state: StateName::from("shipped"),
///     metadata: None,
///     created_at: Utc::now(),
///     sort_key: 10,
/// };
/// assert_eq!(record.to_state.as_str(), "shipped");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionRecord<S: State> {
    /// The state the subject moved to
    pub to_state: S,
    /// Caller supplied metadata, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// When the record was persisted; assigned by the storage adapter
    pub created_at: DateTime<Utc>,
    /// Position of the record within the subject's history
    pub sort_key: u64,
}

/// Ordered history of transition records, oldest first.
///
/// History is immutable - `record` returns a new history with the record
/// appended.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionHistory<S: State> {
    records: Vec<TransitionRecord<S>>,
}

impl<S: State> Default for TransitionHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> From<Vec<TransitionRecord<S>>> for TransitionHistory<S> {
    fn from(records: Vec<TransitionRecord<S>>) -> Self {
        Self { records }
    }
}

impl<S: State> TransitionHistory<S> {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, record: TransitionRecord<S>) -> Self {
        let mut records = self.records.clone();
        records.push(record);
        Self { records }
    }

    /// All records in order.
    pub fn records(&self) -> &[TransitionRecord<S>] {
        &self.records
    }

    /// The most recent record.
    pub fn last(&self) -> Option<&TransitionRecord<S>> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The state this history implies, given the machine's initial state.
    pub fn current_state<'a>(&'a self, initial: &'a S) -> &'a S {
        self.records
            .last()
            .map(|record| &record.to_state)
            .unwrap_or(initial)
    }

    /// Get the path of states traversed.
    ///
    /// The initial state is never persisted, so it is passed in and always
    /// heads the path; each record then contributes its `to_state`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use transitory::core::{StateName, TransitionHistory, TransitionRecord};
    /// use chrono::Utc;
    ///
    /// let history = TransitionHistory::new().record(TransitionRecord {
    ///     to_state: StateName::from("processing"),
    ///     metadata: None,
    ///     created_at: Utc::now(),
    ///     sort_key: 10,
    /// });
    ///
    /// let initial = StateName::from("pending");
    /// let path = history.path(&initial);
    /// assert_eq!(path.len(), 2);
    /// assert_eq!(path[0].as_str(), "pending");
    /// ```
    pub fn path<'a>(&'a self, initial: &'a S) -> Vec<&'a S> {
        std::iter::once(initial)
            .chain(self.records.iter().map(|record| &record.to_state))
            .collect()
    }

    /// Calculate total duration from first to last record.
    ///
    /// Returns `None` if there are no records, or if the timestamps run
    /// backwards.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.records.first(), self.records.last()) {
            let duration = last.created_at.signed_duration_since(first.created_at);
            duration.to_std().ok()
        } else {
            None
        }
    }

    pub fn into_records(self) -> Vec<TransitionRecord<S>> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StateName;

    fn record(to: &str, sort_key: u64, created_at: DateTime<Utc>) -> TransitionRecord<StateName> {
        TransitionRecord {
            to_state: StateName::from(to),
            metadata: None,
            created_at,
            sort_key,
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: TransitionHistory<StateName> = TransitionHistory::new();
        assert!(history.is_empty());
        assert!(history.last().is_none());
        assert!(history.duration().is_none());
    }

    #[test]
    fn record_is_immutable() {
        let history = TransitionHistory::new();
        let new_history = history.record(record("processing", 10, Utc::now()));

        assert_eq!(history.len(), 0);
        assert_eq!(new_history.len(), 1);
    }

    #[test]
    fn current_state_falls_back_to_initial() {
        let initial = StateName::from("pending");
        let history = TransitionHistory::new();
        assert_eq!(history.current_state(&initial), &initial);

        let history = history.record(record("processing", 10, Utc::now()));
        assert_eq!(history.current_state(&initial).as_str(), "processing");
    }

    #[test]
    fn path_starts_with_initial_state() {
        let initial = StateName::from("pending");
        let history = TransitionHistory::new()
            .record(record("processing", 10, Utc::now()))
            .record(record("complete", 20, Utc::now()));

        let names: Vec<&str> = history.path(&initial).iter().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["pending", "processing", "complete"]);
    }

    #[test]
    fn duration_spans_first_to_last_record() {
        let start = Utc::now();
        let history = TransitionHistory::new()
            .record(record("processing", 10, start))
            .record(record("complete", 20, start + chrono::Duration::seconds(3)));

        assert_eq!(history.duration(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn metadata_is_omitted_when_absent() {
        let json = serde_json::to_value(record("processing", 10, Utc::now())).unwrap();
        assert!(json.get("metadata").is_none());

        let back: TransitionRecord<StateName> = serde_json::from_value(json).unwrap();
        assert!(back.metadata.is_none());
    }

    #[test]
    fn history_serializes_correctly() {
        let mut metadata = Metadata::new();
        metadata.insert("by".to_string(), serde_json::json!("ops"));

        let mut rec = record("processing", 10, Utc::now());
        rec.metadata = Some(metadata);
        let history = TransitionHistory::new().record(rec);

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: TransitionHistory<StateName> = serde_json::from_str(&json).unwrap();
        assert_eq!(history, deserialized);
    }
}
