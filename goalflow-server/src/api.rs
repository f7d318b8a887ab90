use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use goalflow_core::planner::Planner;
use goalflow_exec::executor::Executor;
use goalflow_store::RecordStore;
use serde_json::json;
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    planner: Arc<dyn Planner>,
    executor: Arc<Executor>,
    store: Arc<dyn RecordStore>,
}

impl AppState {
    pub fn new(
        planner: Arc<dyn Planner>,
        executor: Arc<Executor>,
        store: Arc<dyn RecordStore>,
    ) -> Self {
        Self {
            planner,
            executor,
            store,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/execute", post(execute))
        .route("/executions", get(list_executions))
        .route("/executions/:id", get(get_execution))
        .route("/health", get(health))
        .with_state(state)
}

#[derive(Debug, serde::Deserialize)]
pub struct ExecuteRequest {
    pub goal: String,
    #[serde(default)]
    pub save: bool,
}

#[derive(Debug, serde::Deserialize)]
pub struct ListParams {
    #[serde(default = "default_limit")]
    limit: i64,
}

fn default_limit() -> i64 {
    10
}

/// Run one goal. The run outcome travels in the body's `status` field;
/// the transport status stays 200 for completed, partially_completed and
/// failed runs alike.
async fn execute(State(state): State<AppState>, Json(req): Json<ExecuteRequest>) -> Response {
    if req.goal.trim().is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": "goal must not be empty" })),
        )
            .into_response();
    }

    let plan = match state.planner.plan(&req.goal) {
        Ok(plan) => plan,
        Err(e) => {
            // Planning failed before any execution started; no record exists.
            return (
                StatusCode::OK,
                Json(json!({
                    "status": "planning_error",
                    "goal": req.goal,
                    "error": e.to_string()
                })),
            )
                .into_response();
        }
    };

    let record = state.executor.execute(&req.goal, plan).await;

    if req.save {
        if let Err(e) = state.store.save(&record).await {
            // The caller already holds the record; persistence failure only
            // costs history, so surface it here and move on.
            tracing::error!(execution_id = %record.id, "failed to persist execution: {e}");
        }
    }

    (StatusCode::OK, Json(record)).into_response()
}

async fn get_execution(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.store.get(id).await {
        Ok(Some(record)) => (StatusCode::OK, Json(record)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "execution not found" })),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

async fn list_executions(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Response {
    match state.store.list(params.limit).await {
        Ok(executions) => {
            let count = executions.len();
            (
                StatusCode::OK,
                Json(json!({ "executions": executions, "count": count })),
            )
                .into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

async fn health() -> Response {
    (
        StatusCode::OK,
        Json(json!({ "status": "healthy", "timestamp": Utc::now().to_rfc3339() })),
    )
        .into_response()
}
