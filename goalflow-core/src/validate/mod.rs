mod rules;
mod validator;

use crate::error::ValidationError;
use crate::types::Plan;
use validator::Validator;

/// Guards applied at plan-validation time.
#[derive(Debug, Clone)]
pub struct PlanLimits {
    pub max_steps: usize,
}

impl Default for PlanLimits {
    fn default() -> Self {
        Self { max_steps: 10 }
    }
}

/// Validate a plan before it reaches the executor: ordinal ids, the step
/// back-reference invariant, template syntax, and extraction paths.
pub fn validate_plan(plan: &Plan, limits: &PlanLimits) -> Result<(), ValidationError> {
    let mut v = Validator::new();
    rules::plan::validate_plan(&mut v, plan, limits);
    v.finish()
}
