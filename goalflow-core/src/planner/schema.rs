use serde_json::Value as JsonValue;

use super::PlanningError;
use crate::types::Plan;
use crate::validate::{validate_plan, PlanLimits};

/// Turn an externally generated plan (untrusted input, e.g. model output)
/// into a [`Plan`], applying the same validation as any other plan before
/// it can reach the executor.
pub fn plan_from_value(value: JsonValue, limits: &PlanLimits) -> Result<Plan, PlanningError> {
    let plan: Plan = serde_json::from_value(value)?;
    validate_plan(&plan, limits)?;
    Ok(plan)
}
