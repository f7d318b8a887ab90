use goalflow_core::{validate_plan, Method, Plan, PlanLimits, Step};
use serde_json::json;

fn get_step(id: usize, url: &str) -> Step {
    Step::new(id, Method::Get, url)
}

#[test]
fn well_formed_chain_passes() {
    let mut first = get_step(0, "https://api.test.local/weather");
    first
        .extract
        .insert("temperature".to_string(), "main.temp".to_string());

    let mut second = Step::new(1, Method::Post, "https://api.test.local/pages");
    second.body = Some(json!({
        "properties": { "Temperature": { "number": "{{step0.temperature}}" } }
    }));

    let plan = Plan::new(vec![first, second]);
    assert!(validate_plan(&plan, &PlanLimits::default()).is_ok());
}

#[test]
fn forward_reference_is_rejected() {
    let mut first = get_step(0, "https://api.test.local/a");
    first.url = "https://api.test.local/a?x={{step1.value}}".to_string();
    let second = get_step(1, "https://api.test.local/b");

    let err = validate_plan(&Plan::new(vec![first, second]), &PlanLimits::default())
        .expect_err("forward reference must fail validation");
    assert!(err
        .violations
        .iter()
        .any(|v| v.message.contains("step1") && v.path.contains("steps[0]")));
}

#[test]
fn self_reference_is_rejected() {
    let mut step = get_step(0, "https://api.test.local/a");
    step.headers
        .insert("X-Prev".to_string(), "{{step0.value}}".to_string());

    assert!(validate_plan(&Plan::new(vec![step]), &PlanLimits::default()).is_err());
}

#[test]
fn step_id_must_match_position() {
    let plan = Plan::new(vec![get_step(0, "https://a.local"), get_step(2, "https://b.local")]);
    let err = validate_plan(&plan, &PlanLimits::default()).unwrap_err();
    assert!(err.violations.iter().any(|v| v.path == "steps[1].id"));
}

#[test]
fn empty_plan_is_rejected() {
    assert!(validate_plan(&Plan::new(vec![]), &PlanLimits::default()).is_err());
}

#[test]
fn step_count_guard_applies() {
    let steps: Vec<Step> = (0..11).map(|i| get_step(i, "https://a.local")).collect();
    let err = validate_plan(&Plan::new(steps), &PlanLimits::default()).unwrap_err();
    assert!(err.violations.iter().any(|v| v.message.contains("limit")));

    let steps: Vec<Step> = (0..11).map(|i| get_step(i, "https://a.local")).collect();
    assert!(validate_plan(&Plan::new(steps), &PlanLimits { max_steps: 20 }).is_ok());
}

#[test]
fn malformed_body_template_is_rejected() {
    let mut step = get_step(0, "https://api.test.local/a");
    step.body = Some(json!({ "note": "{{step0" }));
    assert!(validate_plan(&Plan::new(vec![step]), &PlanLimits::default()).is_err());
}

#[test]
fn bad_extract_path_is_rejected() {
    let mut step = get_step(0, "https://api.test.local/a");
    step.extract
        .insert("value".to_string(), "main..temp".to_string());
    let err = validate_plan(&Plan::new(vec![step]), &PlanLimits::default()).unwrap_err();
    assert!(err.violations.iter().any(|v| v.path.contains("extract")));
}

#[test]
fn empty_url_is_rejected() {
    let step = get_step(0, "  ");
    let err = validate_plan(&Plan::new(vec![step]), &PlanLimits::default()).unwrap_err();
    assert!(err.violations.iter().any(|v| v.path == "steps[0].url"));
}

#[test]
fn templated_query_and_headers_pass() {
    let mut step = get_step(0, "https://api.test.local/a");
    step.query.insert("b".to_string(), "2".to_string());
    step.query.insert("a".to_string(), "1".to_string());
    step.headers
        .insert("Accept".to_string(), "application/json".to_string());
    assert!(validate_plan(&Plan::new(vec![step]), &PlanLimits::default()).is_ok());
}
