use chrono::{TimeZone, Utc};
use goalflow_core::{StepResult, StepStatus};
use goalflow_exec::executor::{resolve_string, resolve_value, ResolveContext, ResolveError};
use goalflow_exec::CredentialStore;
use serde_json::{json, Value as JsonValue};

fn step_result(step_id: usize, extracted: Vec<(&str, JsonValue)>) -> StepResult {
    StepResult {
        step_id,
        status: StepStatus::Success,
        request: None,
        response: None,
        extracted: extracted
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
        error: None,
    }
}

fn fixed_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 6, 12, 30, 0).unwrap()
}

#[test]
fn whole_string_reference_keeps_native_type() {
    let prior = vec![step_result(0, vec![("temperature", json!(31.2))])];
    let credentials = CredentialStore::new();
    let ctx = ResolveContext {
        prior: &prior,
        now: fixed_now(),
        credentials: &credentials,
    };

    let body = json!({ "properties": { "Temperature": { "number": "{{step0.temperature}}" } } });
    let resolved = resolve_value(&body, &ctx).unwrap();
    assert_eq!(resolved["properties"]["Temperature"]["number"], json!(31.2));
    assert!(resolved["properties"]["Temperature"]["number"].is_number());
}

#[test]
fn embedded_reference_is_stringified() {
    let prior = vec![step_result(0, vec![("temperature", json!(31.2))])];
    let credentials = CredentialStore::new();
    let ctx = ResolveContext {
        prior: &prior,
        now: fixed_now(),
        credentials: &credentials,
    };

    let out = resolve_string("Temp: {{step0.temperature}}C", &ctx).unwrap();
    assert_eq!(out, "Temp: 31.2C");
}

#[test]
fn reference_traverses_into_extracted_value() {
    let prior = vec![step_result(
        0,
        vec![("user", json!({ "name": "ada", "langs": ["rust", "ml"] }))],
    )];
    let credentials = CredentialStore::new();
    let ctx = ResolveContext {
        prior: &prior,
        now: fixed_now(),
        credentials: &credentials,
    };

    assert_eq!(
        resolve_value(&json!("{{step0.user.name}}"), &ctx).unwrap(),
        json!("ada")
    );
    assert_eq!(
        resolve_value(&json!("{{step0.user.langs.1}}"), &ctx).unwrap(),
        json!("ml")
    );
}

#[test]
fn unknown_output_key_fails() {
    let prior = vec![step_result(0, vec![("temperature", json!(31.2))])];
    let credentials = CredentialStore::new();
    let ctx = ResolveContext {
        prior: &prior,
        now: fixed_now(),
        credentials: &credentials,
    };

    let err = resolve_string("{{step0.humidity}}", &ctx).unwrap_err();
    assert!(matches!(err, ResolveError::UnknownOutput { step: 0, .. }));
}

#[test]
fn missing_sub_path_fails() {
    let prior = vec![step_result(0, vec![("user", json!({ "name": "ada" }))])];
    let credentials = CredentialStore::new();
    let ctx = ResolveContext {
        prior: &prior,
        now: fixed_now(),
        credentials: &credentials,
    };

    let err = resolve_string("{{step0.user.email}}", &ctx).unwrap_err();
    assert!(matches!(err, ResolveError::MissingPath { .. }));
}

#[test]
fn reference_to_unexecuted_step_fails() {
    let prior: Vec<StepResult> = Vec::new();
    let credentials = CredentialStore::new();
    let ctx = ResolveContext {
        prior: &prior,
        now: fixed_now(),
        credentials: &credentials,
    };

    let err = resolve_string("{{step0.value}}", &ctx).unwrap_err();
    assert!(matches!(err, ResolveError::UnresolvedStep { step: 0 }));
}

#[test]
fn env_reference_reads_credential_store() {
    let prior: Vec<StepResult> = Vec::new();
    let mut credentials = CredentialStore::new();
    credentials.insert("NOTION_TOKEN", "secret-token");
    let ctx = ResolveContext {
        prior: &prior,
        now: fixed_now(),
        credentials: &credentials,
    };

    assert_eq!(
        resolve_string("Bearer {{env.NOTION_TOKEN}}", &ctx).unwrap(),
        "Bearer secret-token"
    );

    let err = resolve_string("{{env.OTHER_TOKEN}}", &ctx).unwrap_err();
    assert!(matches!(err, ResolveError::UnknownCredential { .. }));
}

#[test]
fn now_references_use_injected_clock() {
    let prior: Vec<StepResult> = Vec::new();
    let credentials = CredentialStore::new();
    let ctx = ResolveContext {
        prior: &prior,
        now: fixed_now(),
        credentials: &credentials,
    };

    assert_eq!(
        resolve_string("run at {{now}}", &ctx).unwrap(),
        "run at 2026-08-06 12:30:00"
    );
    assert_eq!(resolve_string("{{now.date}}", &ctx).unwrap(), "2026-08-06");
}

#[test]
fn resolution_is_referentially_transparent() {
    let prior = vec![step_result(
        0,
        vec![("temperature", json!(31.2)), ("conditions", json!("haze"))],
    )];
    let mut credentials = CredentialStore::new();
    credentials.insert("NOTION_TOKEN", "tok");
    let ctx = ResolveContext {
        prior: &prior,
        now: fixed_now(),
        credentials: &credentials,
    };

    let body = json!({
        "title": "Weather - {{now}}",
        "temp": "{{step0.temperature}}",
        "note": "{{step0.conditions}} ({{env.NOTION_TOKEN}})"
    });
    let first = resolve_value(&body, &ctx).unwrap();
    let second = resolve_value(&body, &ctx).unwrap();
    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
}

#[test]
fn non_string_leaves_pass_through_untouched() {
    let prior: Vec<StepResult> = Vec::new();
    let credentials = CredentialStore::new();
    let ctx = ResolveContext {
        prior: &prior,
        now: fixed_now(),
        credentials: &credentials,
    };

    let body = json!({ "n": 42, "b": true, "z": null, "arr": [1, 2] });
    assert_eq!(resolve_value(&body, &ctx).unwrap(), body);
}
