use serde_json::Value as JsonValue;

use crate::expressions::{parse_template, FieldPath};
use crate::types::Step;
use crate::validate::validator::{Validator, OUTPUT_KEY_RE};

pub(crate) fn validate_step(v: &mut Validator, step: &Step, path: &str) {
    if step.url.trim().is_empty() {
        v.push(format!("{path}.url"), "must not be empty");
    } else {
        check_template(v, &format!("{path}.url"), &step.url, step.id);
    }

    for (name, value) in &step.query {
        check_template(v, &format!("{path}.query.{name}"), value, step.id);
    }
    for (name, value) in &step.headers {
        check_template(v, &format!("{path}.headers.{name}"), value, step.id);
    }
    if let Some(body) = &step.body {
        check_value_templates(v, &format!("{path}.body"), body, step.id);
    }

    for (key, field_path) in &step.extract {
        let epath = format!("{path}.extract.{key}");
        if !OUTPUT_KEY_RE.is_match(key) {
            v.push(&epath, "output key must be a valid identifier");
        }
        if let Err(e) = FieldPath::parse(field_path) {
            v.push(&epath, e.to_string());
        }
    }
}

/// Parse one template string and enforce the back-reference invariant:
/// references may only target steps with a strictly smaller id.
fn check_template(v: &mut Validator, path: &str, input: &str, step_id: usize) {
    let tpl = match parse_template(input) {
        Ok(t) => t,
        Err(e) => {
            v.push(path, e.to_string());
            return;
        }
    };

    for reference in tpl.references() {
        if let Some(target) = reference.step_id() {
            if target >= step_id {
                v.push(
                    path,
                    format!("reference to step{target} is not an earlier step (this is step{step_id})"),
                );
            }
        }
    }
}

fn check_value_templates(v: &mut Validator, path: &str, value: &JsonValue, step_id: usize) {
    match value {
        JsonValue::Null | JsonValue::Bool(_) | JsonValue::Number(_) => {}
        JsonValue::String(s) => check_template(v, path, s, step_id),
        JsonValue::Array(arr) => {
            for (i, item) in arr.iter().enumerate() {
                check_value_templates(v, &format!("{path}[{i}]"), item, step_id);
            }
        }
        JsonValue::Object(map) => {
            for (k, item) in map {
                check_value_templates(v, &format!("{path}.{k}"), item, step_id);
            }
        }
    }
}
