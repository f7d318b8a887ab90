mod rules;
mod schema;

pub use rules::{default_recipes, Recipe, RulePlanner};
pub use schema::plan_from_value;

use crate::error::ValidationError;
use crate::types::Plan;

/// Decompose a goal into an ordered plan.
///
/// Implementations must be free of side effects: no network I/O happens
/// between a `plan` call and the first step's execution. Variants that
/// rely on external generation (e.g. a model) produce their candidate
/// plan elsewhere and funnel it through [`plan_from_value`].
pub trait Planner: Send + Sync {
    fn plan(&self, goal: &str) -> Result<Plan, PlanningError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PlanningError {
    #[error("goal does not match any known action: {0}")]
    UnrecognizedGoal(String),

    #[error("plan is not well-formed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}
