//! # Snapshot Store
//!
//! Keyed persistence for snapshot records. Records are stored as JSON under
//! `(entity, id)`; a second `put` on the same key replaces the first.
//!
//! [`load_or_create`] and [`persist`] are the typed entry points used by the
//! assemblers.

pub mod memory;
pub mod postgres;

pub use memory::MemorySnapshotStore;
pub use postgres::PgSnapshotStore;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use log::debug;

use crate::metrics;
use crate::types::Snapshot;

/// Serialized snapshot as handed to a store backend.
#[derive(Debug, Clone)]
pub struct StoredSnapshot {
    pub entity: &'static str,
    pub id: String,
    pub block_number: u64,
    pub block_time: Option<DateTime<Utc>>,
    pub data: serde_json::Value,
}

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn get(&self, entity: &str, id: &str) -> Result<Option<serde_json::Value>>;
    async fn put(&self, record: StoredSnapshot) -> Result<()>;
}

/// Fetch the record stored under `id`, or a fresh one with the same identity.
pub async fn load_or_create<R, S>(store: &S, entity: &'static str, id: &str) -> Result<R>
where
    R: Snapshot,
    S: SnapshotStore + ?Sized,
{
    match store.get(entity, id).await? {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(R::new(id.to_string())),
    }
}

/// Serialize and upsert `record`. Called exactly once per handled event.
pub async fn persist<R, S>(store: &S, entity: &'static str, record: &R) -> Result<()>
where
    R: Snapshot,
    S: SnapshotStore + ?Sized,
{
    let block_time = i64::try_from(record.block_timestamp())
        .ok()
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single());
    store
        .put(StoredSnapshot {
            entity,
            id: record.id().to_string(),
            block_number: record.block_number(),
            block_time,
            data: serde_json::to_value(record)?,
        })
        .await?;
    metrics::increment_snapshot_written(entity);
    debug!(
        "Persisted {} {} at block {}",
        entity,
        record.id(),
        record.block_number()
    );
    Ok(())
}
