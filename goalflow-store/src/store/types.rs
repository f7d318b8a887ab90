use chrono::{DateTime, Utc};
use goalflow_core::RunStatus;
use uuid::Uuid;

/// One row of the recent-executions listing; the full trace lives behind
/// [`crate::RecordStore::get`].
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ExecutionSummary {
    pub id: Uuid,
    pub goal: String,
    pub status: RunStatus,
    pub created_at: DateTime<Utc>,
}
