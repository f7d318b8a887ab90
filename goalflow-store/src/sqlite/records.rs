use chrono::{DateTime, Utc};
use goalflow_core::{ExecutionRecord, RunStatus};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::store::{ExecutionSummary, StoreError};

#[derive(sqlx::FromRow)]
struct RecordRow {
    record: String,
}

#[derive(sqlx::FromRow)]
struct SummaryRow {
    id: String,
    goal: String,
    status: String,
    created_at: String,
}

pub async fn insert_record(pool: &SqlitePool, record: &ExecutionRecord) -> Result<(), StoreError> {
    let json = serde_json::to_string(record)
        .map_err(|e| StoreError::Other(format!("failed to serialize record: {e}")))?;

    sqlx::query(
        r#"
INSERT OR REPLACE INTO executions (id, goal, status, record, created_at)
VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(record.id.to_string())
    .bind(&record.goal)
    .bind(record.status.as_str())
    .bind(json)
    .bind(record.created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_record(pool: &SqlitePool, id: Uuid) -> Result<Option<ExecutionRecord>, StoreError> {
    let row = sqlx::query_as::<_, RecordRow>("SELECT record FROM executions WHERE id = ?1")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    match row {
        None => Ok(None),
        Some(r) => serde_json::from_str(&r.record)
            .map(Some)
            .map_err(|e| StoreError::Other(format!("corrupt stored record: {e}"))),
    }
}

pub async fn list_records(pool: &SqlitePool, limit: i64) -> Result<Vec<ExecutionSummary>, StoreError> {
    let rows = sqlx::query_as::<_, SummaryRow>(
        r#"
SELECT id, goal, status, created_at
FROM executions
ORDER BY created_at DESC
LIMIT ?1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(summary_from_row).collect()
}

fn summary_from_row(row: SummaryRow) -> Result<ExecutionSummary, StoreError> {
    let id = Uuid::parse_str(&row.id)
        .map_err(|e| StoreError::Other(format!("corrupt execution id: {e}")))?;
    let created_at = DateTime::parse_from_rfc3339(&row.created_at)
        .map_err(|e| StoreError::Other(format!("corrupt created_at: {e}")))?
        .with_timezone(&Utc);
    let status = parse_status(&row.status)?;

    Ok(ExecutionSummary {
        id,
        goal: row.goal,
        status,
        created_at,
    })
}

fn parse_status(raw: &str) -> Result<RunStatus, StoreError> {
    match raw {
        "completed" => Ok(RunStatus::Completed),
        "partially_completed" => Ok(RunStatus::PartiallyCompleted),
        "failed" => Ok(RunStatus::Failed),
        other => Err(StoreError::Other(format!("unknown run status: {other}"))),
    }
}
