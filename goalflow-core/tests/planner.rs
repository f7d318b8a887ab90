use goalflow_core::planner::{plan_from_value, Planner, PlanningError, RulePlanner};
use goalflow_core::{Method, PlanLimits};
use serde_json::json;

fn planner() -> RulePlanner {
    RulePlanner::with_default_catalog(PlanLimits::default())
}

#[test]
fn weather_to_notion_goal_builds_two_step_chain() {
    let plan = planner()
        .plan("Get the weather in Mumbai and save it to my Notion database")
        .unwrap();

    assert_eq!(plan.len(), 2);

    let fetch = &plan.steps[0];
    assert_eq!(fetch.method, Method::Get);
    assert_eq!(fetch.query.get("q").map(String::as_str), Some("Mumbai"));
    assert_eq!(
        fetch.extract.get("temperature").map(String::as_str),
        Some("main.temp")
    );

    let save = &plan.steps[1];
    assert_eq!(save.method, Method::Post);
    let body = save.body.as_ref().unwrap();
    assert_eq!(
        body["properties"]["Temperature"]["number"],
        json!("{{step0.temperature}}")
    );
    let title = body["properties"]["Name"]["title"][0]["text"]["content"]
        .as_str()
        .unwrap();
    assert!(title.starts_with("Mumbai weather"));
}

#[test]
fn plain_weather_goal_builds_single_step() {
    let plan = planner().plan("what is the weather in Paris").unwrap();
    assert_eq!(plan.len(), 1);
    assert_eq!(plan.steps[0].query.get("q").map(String::as_str), Some("Paris"));
}

#[test]
fn github_stars_goal_expands_repo_captures() {
    let plan = planner().plan("check the stars for rust-lang/regex").unwrap();
    assert_eq!(plan.len(), 1);
    assert_eq!(
        plan.steps[0].url,
        "https://api.github.com/repos/rust-lang/regex"
    );
}

#[test]
fn telegram_goal_carries_message_text() {
    let plan = planner()
        .plan("send a telegram message saying \"deploy finished\"")
        .unwrap();
    assert_eq!(plan.len(), 1);
    let body = plan.steps[0].body.as_ref().unwrap();
    assert_eq!(body["text"], json!("deploy finished"));
}

#[test]
fn unrecognized_goal_is_a_planning_error() {
    let err = planner().plan("fold my laundry").unwrap_err();
    assert!(matches!(err, PlanningError::UnrecognizedGoal(_)));
}

#[test]
fn untrusted_plan_json_is_schema_checked() {
    let limits = PlanLimits::default();

    let ok = plan_from_value(
        json!({
            "steps": [
                { "id": 0, "method": "GET", "url": "https://api.test.local/a",
                  "extract": { "value": "data.value" } },
                { "id": 1, "method": "POST", "url": "https://api.test.local/b",
                  "body": { "v": "{{step0.value}}" } }
            ]
        }),
        &limits,
    );
    assert!(ok.is_ok());

    let forward = plan_from_value(
        json!({
            "steps": [
                { "id": 0, "method": "GET", "url": "https://a.local?x={{step1.value}}" },
                { "id": 1, "method": "GET", "url": "https://b.local" }
            ]
        }),
        &limits,
    );
    assert!(matches!(forward, Err(PlanningError::Invalid(_))));

    let not_a_plan = plan_from_value(json!({ "steps": "nope" }), &limits);
    assert!(matches!(not_a_plan, Err(PlanningError::Malformed(_))));
}
