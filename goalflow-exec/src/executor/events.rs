use async_trait::async_trait;
use goalflow_core::{RunStatus, StepStatus};
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub enum Event {
    RunStarted {
        run_id: Uuid,
        goal: String,
    },
    RunFinished {
        run_id: Uuid,
        status: RunStatus,
    },
    StepStarted {
        run_id: Uuid,
        step_id: usize,
    },
    StepSucceeded {
        run_id: Uuid,
        step_id: usize,
    },
    StepFailed {
        run_id: Uuid,
        step_id: usize,
        status: StepStatus,
    },
    StepRetryScheduled {
        run_id: Uuid,
        step_id: usize,
        delay_ms: u64,
    },
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: Event);
}

pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: Event) {}
}

/// One JSON object per line on stdout.
pub struct StdoutEventSink;

#[async_trait]
impl EventSink for StdoutEventSink {
    async fn emit(&self, event: Event) {
        let json = match event {
            Event::RunStarted { run_id, goal } => {
                json!({ "type": "run.started", "run_id": run_id.to_string(), "goal": goal })
            }
            Event::RunFinished { run_id, status } => {
                json!({ "type": "run.finished", "run_id": run_id.to_string(), "status": status.as_str() })
            }
            Event::StepStarted { run_id, step_id } => {
                json!({ "type": "step.started", "run_id": run_id.to_string(), "step_id": step_id })
            }
            Event::StepSucceeded { run_id, step_id } => {
                json!({ "type": "step.succeeded", "run_id": run_id.to_string(), "step_id": step_id })
            }
            Event::StepFailed {
                run_id,
                step_id,
                status,
            } => {
                json!({ "type": "step.failed", "run_id": run_id.to_string(), "step_id": step_id, "status": status.as_str() })
            }
            Event::StepRetryScheduled {
                run_id,
                step_id,
                delay_ms,
            } => {
                json!({ "type": "step.retry_scheduled", "run_id": run_id.to_string(), "step_id": step_id, "delay_ms": delay_ms })
            }
        };
        println!("{}", serde_json::to_string(&json).unwrap_or_default());
    }
}

pub struct CompositeEventSink {
    sinks: Vec<Box<dyn EventSink>>,
}

impl Default for CompositeEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositeEventSink {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn add(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }
}

#[async_trait]
impl EventSink for CompositeEventSink {
    async fn emit(&self, event: Event) {
        for sink in &self.sinks {
            let event_clone = event.clone();
            sink.emit(event_clone).await;
        }
    }
}
