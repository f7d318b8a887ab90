#![forbid(unsafe_code)]

pub mod sqlite;
pub mod store;

pub use crate::sqlite::{run_migrations, SqliteRecordStore};
pub use crate::store::{ExecutionSummary, RecordStore, StoreError};
