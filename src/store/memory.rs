use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use super::{SnapshotStore, StoredSnapshot};
use crate::types::Snapshot;

/// In-process store backed by a `DashMap`, used for dry runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    records: Arc<DashMap<(String, String), serde_json::Value>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records stored under `entity`.
    pub fn count(&self, entity: &str) -> usize {
        self.records
            .iter()
            .filter(|entry| entry.key().0 == entity)
            .count()
    }

    /// Typed read; `None` when absent or not decodable as `R`.
    pub fn snapshot<R: Snapshot>(&self, entity: &str, id: &str) -> Option<R> {
        self.records
            .get(&(entity.to_string(), id.to_string()))
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn get(&self, entity: &str, id: &str) -> Result<Option<serde_json::Value>> {
        Ok(self
            .records
            .get(&(entity.to_string(), id.to_string()))
            .map(|value| value.clone()))
    }

    async fn put(&self, record: StoredSnapshot) -> Result<()> {
        self.records
            .insert((record.entity.to_string(), record.id), record.data);
        Ok(())
    }
}
