//! In-memory storage adapter.

use super::{StorageAdapter, StorageError};
use crate::core::{Metadata, State, TransitionRecord};
use chrono::Utc;
use parking_lot::RwLock;
use std::sync::Arc;

/// Gap between consecutive sort keys.
pub const SORT_KEY_STEP: u64 = 10;

/// Transition log held in process memory.
///
/// Clones share the same log, so several machine instances can be bound to
/// one subject's history.
#[derive(Clone, Debug)]
pub struct MemoryAdapter<S: State> {
    records: Arc<RwLock<Vec<TransitionRecord<S>>>>,
}

impl<S: State> MemoryAdapter<S> {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Seed the log with records persisted elsewhere.
    pub fn from_records(records: Vec<TransitionRecord<S>>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl<S: State> Default for MemoryAdapter<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StorageAdapter<S> for MemoryAdapter<S> {
    fn last(&self) -> Result<Option<TransitionRecord<S>>, StorageError> {
        Ok(self.records.read().last().cloned())
    }

    fn history(&self) -> Result<Vec<TransitionRecord<S>>, StorageError> {
        Ok(self.records.read().clone())
    }

    fn create(
        &self,
        to_state: S,
        metadata: Option<Metadata>,
    ) -> Result<TransitionRecord<S>, StorageError> {
        let mut records = self.records.write();
        let sort_key = records.last().map_or(0, |r| r.sort_key) + SORT_KEY_STEP;
        let record = TransitionRecord {
            to_state,
            metadata,
            created_at: Utc::now(),
            sort_key,
        };
        records.push(record.clone());

        tracing::trace!(
            to = %record.to_state.name(),
            sort_key = record.sort_key,
            "appended transition record"
        );

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StateName;

    #[test]
    fn empty_adapter_has_no_last_record() {
        let adapter: MemoryAdapter<StateName> = MemoryAdapter::new();
        assert!(adapter.last().unwrap().is_none());
        assert!(adapter.history().unwrap().is_empty());
        assert!(adapter.is_empty());
    }

    #[test]
    fn create_appends_in_order_with_increasing_sort_keys() {
        let adapter = MemoryAdapter::new();
        adapter.create(StateName::from("a"), None).unwrap();
        adapter.create(StateName::from("b"), None).unwrap();

        let history = adapter.history().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].to_state.as_str(), "a");
        assert_eq!(history[0].sort_key, 10);
        assert_eq!(history[1].to_state.as_str(), "b");
        assert_eq!(history[1].sort_key, 20);
        assert_eq!(adapter.last().unwrap().unwrap().to_state.as_str(), "b");
    }

    #[test]
    fn create_returns_persisted_record_with_metadata() {
        let adapter = MemoryAdapter::new();
        let mut metadata = Metadata::new();
        metadata.insert("reason".to_string(), serde_json::json!("manual"));

        let record = adapter
            .create(StateName::from("a"), Some(metadata.clone()))
            .unwrap();

        assert_eq!(record.metadata, Some(metadata));
        assert_eq!(adapter.last().unwrap(), Some(record));
    }

    #[test]
    fn clones_share_the_same_log() {
        let adapter = MemoryAdapter::new();
        let clone = adapter.clone();
        clone.create(StateName::from("a"), None).unwrap();

        assert_eq!(adapter.len(), 1);
    }

    #[test]
    fn seeded_adapter_continues_sort_keys() {
        let seeded = MemoryAdapter::new();
        seeded.create(StateName::from("a"), None).unwrap();

        let adapter = MemoryAdapter::from_records(seeded.history().unwrap());
        let record = adapter.create(StateName::from("b"), None).unwrap();
        assert_eq!(record.sort_key, 20);
    }
}
