use async_trait::async_trait;
use goalflow_core::ExecutionRecord;
use uuid::Uuid;

use crate::store::types::ExecutionSummary;

/// Durable home for sealed execution records. Writes are append-only and
/// independent per record; implementations must tolerate concurrent saves
/// from unrelated runs.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn save(&self, record: &ExecutionRecord) -> Result<(), StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<ExecutionRecord>, StoreError>;

    /// Most recent first.
    async fn list(&self, limit: i64) -> Result<Vec<ExecutionSummary>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store error: {0}")]
    Other(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Other(e.to_string())
    }
}
