use sqlx::SqlitePool;

use crate::store::StoreError;

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StoreError> {
    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS executions (
  id TEXT PRIMARY KEY,
  goal TEXT NOT NULL,
  status TEXT NOT NULL,
  record TEXT NOT NULL,
  created_at TEXT NOT NULL
)
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS executions_created_at_idx ON executions (created_at DESC)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
