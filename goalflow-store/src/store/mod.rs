mod trait_store;
mod types;

pub use trait_store::{RecordStore, StoreError};
pub use types::ExecutionSummary;
