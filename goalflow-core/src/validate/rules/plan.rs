use crate::types::Plan;
use crate::validate::rules::step::validate_step;
use crate::validate::validator::Validator;
use crate::validate::PlanLimits;

pub(crate) fn validate_plan(v: &mut Validator, plan: &Plan, limits: &PlanLimits) {
    if plan.steps.is_empty() {
        v.push("steps", "plan must contain at least one step");
        return;
    }

    if plan.steps.len() > limits.max_steps {
        v.push(
            "steps",
            format!(
                "plan has {} steps, exceeding the limit of {}",
                plan.steps.len(),
                limits.max_steps
            ),
        );
    }

    for (idx, step) in plan.steps.iter().enumerate() {
        let path = format!("steps[{idx}]");
        if step.id != idx {
            v.push(
                format!("{path}.id"),
                format!("step id must equal its ordinal position (expected {idx}, got {})", step.id),
            );
        }
        validate_step(v, step, &path);
    }
}
