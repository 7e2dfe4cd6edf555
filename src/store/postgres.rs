use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{Pool, Postgres, Row};
use std::env;
use std::time::Duration;

use super::{SnapshotStore, StoredSnapshot};

/// PostgreSQL connection pool type alias.
pub type DbPool = Pool<Postgres>;

/// Database schema name
pub const SCHEMA: &str = "defi_snapshots";

/// Snapshot store backed by a single `snapshots` table keyed by `(entity, id)`.
#[derive(Debug, Clone)]
pub struct PgSnapshotStore {
    pool: DbPool,
}

impl PgSnapshotStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Connect using `database_url`, falling back to `DATABASE_URL`.
    pub async fn connect(database_url: Option<&str>) -> Result<Self> {
        let pool = connect(database_url).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

pub async fn connect(database_url: Option<&str>) -> Result<DbPool> {
    // Force UTF-8 client encoding FIRST to avoid Windows sqlx bug with non-ASCII error messages
    env::set_var("PGCLIENTENCODING", "UTF8");

    let database_url = match database_url {
        Some(url) => url.to_string(),
        None => env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set for the postgres store"))?,
    };

    // Retries with backoff to survive DNS/startup races in Compose
    let mut last_err: Option<anyhow::Error> = None;
    let max_attempts: u32 = 10;
    for attempt in 1..=max_attempts {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect(&database_url)
            .await
        {
            Ok(pool) => {
                log::info!(
                    "Connected to database (attempt {}/{}).",
                    attempt,
                    max_attempts
                );
                if let Err(e) = initialize_database(&pool).await {
                    last_err = Some(e);
                } else {
                    return Ok(pool);
                }
            }
            Err(e) => {
                last_err = Some(e.into());
            }
        }
        let delay_ms = (1u64 << attempt.min(6)) * 200; // 200ms, 400ms, 800ms, ... capped at ~12.8s
        log::warn!(
            "DB connect/init attempt {}/{} failed. Retrying in {} ms...",
            attempt,
            max_attempts,
            delay_ms
        );
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
    Err(last_err.unwrap_or_else(|| anyhow::anyhow!("Unknown DB connection error")))
}

pub async fn initialize_database(pool: &DbPool) -> Result<()> {
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", SCHEMA))
        .execute(pool)
        .await?;
    sqlx::query(&format!(
        "CREATE TABLE IF NOT EXISTS {}.snapshots (
            entity TEXT NOT NULL,
            id TEXT NOT NULL,
            block_number BIGINT NOT NULL,
            block_time TIMESTAMPTZ,
            data JSONB NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            PRIMARY KEY (entity, id)
        )",
        SCHEMA
    ))
    .execute(pool)
    .await?;
    sqlx::query(&format!(
        "CREATE INDEX IF NOT EXISTS snapshots_entity_block_idx ON {}.snapshots (entity, block_number)",
        SCHEMA
    ))
    .execute(pool)
    .await?;
    log::info!("Database schema {} ready.", SCHEMA);
    Ok(())
}

#[async_trait]
impl SnapshotStore for PgSnapshotStore {
    async fn get(&self, entity: &str, id: &str) -> Result<Option<serde_json::Value>> {
        let row = sqlx::query(&format!(
            "SELECT data FROM {}.snapshots WHERE entity = $1 AND id = $2",
            SCHEMA
        ))
        .bind(entity)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let Json(data): Json<serde_json::Value> = row.try_get("data")?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    async fn put(&self, record: StoredSnapshot) -> Result<()> {
        let block_number = i64::try_from(record.block_number)?;
        sqlx::query(&format!(
            "INSERT INTO {}.snapshots (entity, id, block_number, block_time, data, updated_at)
             VALUES ($1, $2, $3, $4, $5, NOW())
             ON CONFLICT (entity, id) DO UPDATE SET
                block_number = EXCLUDED.block_number,
                block_time = EXCLUDED.block_time,
                data = EXCLUDED.data,
                updated_at = NOW()",
            SCHEMA
        ))
        .bind(record.entity)
        .bind(&record.id)
        .bind(block_number)
        .bind(record.block_time)
        .bind(Json(&record.data))
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
