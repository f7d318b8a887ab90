#![forbid(unsafe_code)]

pub mod error;
pub mod expressions;
pub mod planner;
pub mod types;
pub mod validate;

pub use crate::error::{ValidationError, Violation};
pub use crate::planner::{plan_from_value, Planner, PlanningError, RulePlanner};
pub use crate::types::{
    ExecutionRecord, Method, Plan, RequestSnapshot, ResponseSnapshot, RunStatus, Step, StepResult,
    StepStatus,
};
pub use crate::validate::{validate_plan, PlanLimits};
