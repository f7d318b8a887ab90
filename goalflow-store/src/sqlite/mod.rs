mod migrate;
mod records;

pub use migrate::run_migrations;

use std::str::FromStr;

use async_trait::async_trait;
use goalflow_core::ExecutionRecord;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::store::{ExecutionSummary, RecordStore, StoreError};

pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn save(&self, record: &ExecutionRecord) -> Result<(), StoreError> {
        records::insert_record(&self.pool, record).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<ExecutionRecord>, StoreError> {
        records::get_record(&self.pool, id).await
    }

    async fn list(&self, limit: i64) -> Result<Vec<ExecutionSummary>, StoreError> {
        records::list_records(&self.pool, limit).await
    }
}
