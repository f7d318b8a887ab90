use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use goalflow_core::{
    ExecutionRecord, Method, Plan, RequestSnapshot, ResponseSnapshot, RunStatus, Step, StepResult,
    StepStatus,
};
use goalflow_store::{run_migrations, RecordStore, SqliteRecordStore};
use serde_json::json;
use uuid::Uuid;

async fn memory_store() -> SqliteRecordStore {
    // A single connection keeps the in-memory database alive and shared.
    let store = SqliteRecordStore::connect("sqlite::memory:", 1)
        .await
        .unwrap();
    run_migrations(store.pool()).await.unwrap();
    store
}

fn sample_record(goal: &str, status: RunStatus, minute: u32) -> ExecutionRecord {
    let mut step = Step::new(0, Method::Get, "https://api.test.local/weather");
    step.extract
        .insert("temperature".to_string(), "main.temp".to_string());

    let result = StepResult {
        step_id: 0,
        status: StepStatus::Success,
        request: Some(RequestSnapshot {
            method: Method::Get,
            url: "https://api.test.local/weather?q=Mumbai".to_string(),
            headers: BTreeMap::new(),
            body: None,
        }),
        response: Some(ResponseSnapshot {
            status: 200,
            headers: BTreeMap::new(),
            body: json!({ "main": { "temp": 31.2 } }),
        }),
        extracted: [("temperature".to_string(), json!(31.2))].into_iter().collect(),
        error: None,
    };

    ExecutionRecord {
        id: Uuid::new_v4(),
        goal: goal.to_string(),
        plan: Plan::new(vec![step]),
        results: vec![result],
        status,
        created_at: Utc.with_ymd_and_hms(2026, 8, 6, 12, minute, 0).unwrap(),
    }
}

#[tokio::test]
async fn save_then_get_round_trips_the_record() {
    let store = memory_store().await;
    let record = sample_record("weather in Mumbai", RunStatus::Completed, 0);

    store.save(&record).await.unwrap();

    let loaded = store.get(record.id).await.unwrap().expect("record exists");
    assert_eq!(loaded, record);
}

#[tokio::test]
async fn get_unknown_id_is_none() {
    let store = memory_store().await;
    assert!(store.get(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_returns_newest_first_up_to_limit() {
    let store = memory_store().await;

    let older = sample_record("first goal", RunStatus::Completed, 1);
    let newer = sample_record("second goal", RunStatus::Failed, 30);
    store.save(&older).await.unwrap();
    store.save(&newer).await.unwrap();

    let listed = store.list(10).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, newer.id);
    assert_eq!(listed[0].status, RunStatus::Failed);
    assert_eq!(listed[1].id, older.id);

    let limited = store.list(1).await.unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].goal, "second goal");
}

#[tokio::test]
async fn saving_twice_is_idempotent() {
    let store = memory_store().await;
    let record = sample_record("weather in Mumbai", RunStatus::Completed, 0);

    store.save(&record).await.unwrap();
    store.save(&record).await.unwrap();

    assert_eq!(store.list(10).await.unwrap().len(), 1);
}
