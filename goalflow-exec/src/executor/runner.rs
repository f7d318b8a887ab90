use std::collections::BTreeMap;
use std::sync::Arc;

use goalflow_core::{
    ExecutionRecord, Plan, ResponseSnapshot, RunStatus, Step, StepResult, StepStatus,
};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::clock::Clock;
use crate::credentials::CredentialStore;
use crate::executor::events::{Event, EventSink};
use crate::executor::extract::{extract_outputs, parse_body_json};
use crate::executor::http::{HttpClient, HttpResponseParts};
use crate::executor::request::{build_request, RequestBuildResult};
use crate::executor::resolve::ResolveContext;
use crate::executor::types::ExecutorConfig;

/// Runs one validated plan at a time, strictly sequentially: later steps
/// may reference earlier outputs, and any failure halts the run because
/// downstream steps presumptively depend on the failed one.
pub struct Executor {
    config: ExecutorConfig,
    http: Arc<dyn HttpClient>,
    credentials: Arc<CredentialStore>,
    clock: Arc<dyn Clock>,
    event_sink: Arc<dyn EventSink>,
}

impl Executor {
    pub fn new(
        config: ExecutorConfig,
        http: Arc<dyn HttpClient>,
        credentials: Arc<CredentialStore>,
        clock: Arc<dyn Clock>,
        event_sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            config,
            http,
            credentials,
            clock,
            event_sink,
        }
    }

    /// Execute a plan and seal the record. Dropping the returned future
    /// abandons steps not yet dispatched; an in-flight outbound call is
    /// not retracted.
    pub async fn execute(&self, goal: &str, plan: Plan) -> ExecutionRecord {
        let run_id = Uuid::new_v4();
        let created_at = self.clock.now();

        self.event_sink
            .emit(Event::RunStarted {
                run_id,
                goal: goal.to_string(),
            })
            .await;

        let mut results: Vec<StepResult> = Vec::with_capacity(plan.len());
        for step in &plan.steps {
            self.event_sink
                .emit(Event::StepStarted {
                    run_id,
                    step_id: step.id,
                })
                .await;

            let result = self.attempt_step(run_id, step, &results).await;
            let status = result.status;

            if status.is_success() {
                self.event_sink
                    .emit(Event::StepSucceeded {
                        run_id,
                        step_id: step.id,
                    })
                    .await;
            } else {
                self.event_sink
                    .emit(Event::StepFailed {
                        run_id,
                        step_id: step.id,
                        status,
                    })
                    .await;
            }

            results.push(result);
            if !status.is_success() {
                break;
            }
        }

        let status = seal_status(&plan, &results);
        self.event_sink
            .emit(Event::RunFinished { run_id, status })
            .await;

        ExecutionRecord {
            id: run_id,
            goal: goal.to_string(),
            plan,
            results,
            status,
            created_at,
        }
    }

    async fn attempt_step(&self, run_id: Uuid, step: &Step, prior: &[StepResult]) -> StepResult {
        let ctx = ResolveContext {
            prior,
            now: self.clock.now(),
            credentials: &self.credentials,
        };

        let RequestBuildResult { snapshot, parts } = match build_request(step, &ctx) {
            Ok(built) => built,
            Err(e) => {
                return StepResult {
                    step_id: step.id,
                    status: StepStatus::TemplateError,
                    request: None,
                    response: None,
                    extracted: BTreeMap::new(),
                    error: Some(e.to_string()),
                }
            }
        };

        let mut retries = 0usize;
        let response = loop {
            match self
                .http
                .send(
                    parts.clone(),
                    self.config.request_timeout,
                    self.config.max_response_bytes,
                )
                .await
            {
                Ok(resp) => break resp,
                Err(err) if err.is_transient() && retries < self.config.max_network_retries => {
                    retries += 1;
                    let delay = self.config.network_retry_backoff;
                    self.event_sink
                        .emit(Event::StepRetryScheduled {
                            run_id,
                            step_id: step.id,
                            delay_ms: delay.as_millis() as u64,
                        })
                        .await;
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    return StepResult {
                        step_id: step.id,
                        status: StepStatus::NetworkError,
                        request: Some(snapshot),
                        response: None,
                        extracted: BTreeMap::new(),
                        error: Some(err.to_string()),
                    }
                }
            }
        };

        let body_json = parse_body_json(&response);
        let response_snapshot = snapshot_response(&response, body_json.clone());

        if !(200..300).contains(&response.status) {
            return StepResult {
                step_id: step.id,
                status: StepStatus::HttpError,
                request: Some(snapshot),
                response: Some(response_snapshot),
                extracted: BTreeMap::new(),
                error: Some(format!("collaborator returned HTTP {}", response.status)),
            };
        }

        match extract_outputs(&step.extract, body_json.as_ref()) {
            Ok(extracted) => StepResult {
                step_id: step.id,
                status: StepStatus::Success,
                request: Some(snapshot),
                response: Some(response_snapshot),
                extracted,
                error: None,
            },
            Err(e) => StepResult {
                step_id: step.id,
                status: StepStatus::ExtractError,
                request: Some(snapshot),
                response: Some(response_snapshot),
                extracted: BTreeMap::new(),
                error: Some(e.to_string()),
            },
        }
    }
}

fn snapshot_response(resp: &HttpResponseParts, body_json: Option<JsonValue>) -> ResponseSnapshot {
    let body = body_json
        .unwrap_or_else(|| JsonValue::String(String::from_utf8_lossy(&resp.body).to_string()));
    ResponseSnapshot {
        status: resp.status,
        headers: resp.headers.clone(),
        body,
    }
}

fn seal_status(plan: &Plan, results: &[StepResult]) -> RunStatus {
    let succeeded = results.iter().filter(|r| r.status.is_success()).count();
    if succeeded == plan.len() {
        RunStatus::Completed
    } else if succeeded > 0 {
        RunStatus::PartiallyCompleted
    } else {
        RunStatus::Failed
    }
}
