use chrono::{DateTime, Utc};
use goalflow_core::expressions::{
    parse_template, NowFormat, Reference, Segment, TemplateError,
};
use goalflow_core::StepResult;
use secrecy::ExposeSecret;
use serde_json::Value as JsonValue;

use crate::credentials::CredentialStore;

/// Everything a template may draw on: the results of the steps already
/// executed, the run timestamp, and the configured credentials. Resolution
/// is a pure function of this context.
pub struct ResolveContext<'a> {
    pub prior: &'a [StepResult],
    pub now: DateTime<Utc>,
    pub credentials: &'a CredentialStore,
}

/// Resolve a JSON template value. A string consisting of exactly one
/// reference takes the referenced value's native type; anything else
/// resolves in string context.
pub fn resolve_value(value: &JsonValue, ctx: &ResolveContext<'_>) -> Result<JsonValue, ResolveError> {
    match value {
        JsonValue::Null | JsonValue::Bool(_) | JsonValue::Number(_) => Ok(value.clone()),
        JsonValue::String(s) => resolve_template_string(s, ctx),
        JsonValue::Array(arr) => {
            let mut out = Vec::with_capacity(arr.len());
            for v in arr {
                out.push(resolve_value(v, ctx)?);
            }
            Ok(JsonValue::Array(out))
        }
        JsonValue::Object(map) => {
            let mut out = serde_json::Map::new();
            for (k, v) in map {
                out.insert(k.clone(), resolve_value(v, ctx)?);
            }
            Ok(JsonValue::Object(out))
        }
    }
}

/// Resolve a template in string context (URLs, query values, headers).
pub fn resolve_string(input: &str, ctx: &ResolveContext<'_>) -> Result<String, ResolveError> {
    let tpl = parse_template(input)?;
    let mut out = String::new();
    for seg in tpl.segments {
        match seg {
            Segment::Literal(l) => out.push_str(&l),
            Segment::Reference(r) => out.push_str(&stringify(&resolve_reference(&r, ctx)?)),
        }
    }
    Ok(out)
}

fn resolve_template_string(s: &str, ctx: &ResolveContext<'_>) -> Result<JsonValue, ResolveError> {
    let tpl = parse_template(s)?;
    if let Some(reference) = tpl.as_single_reference() {
        return resolve_reference(reference, ctx);
    }

    let mut out = String::new();
    for seg in tpl.segments {
        match seg {
            Segment::Literal(l) => out.push_str(&l),
            Segment::Reference(r) => out.push_str(&stringify(&resolve_reference(&r, ctx)?)),
        }
    }
    Ok(JsonValue::String(out))
}

fn resolve_reference(
    reference: &Reference,
    ctx: &ResolveContext<'_>,
) -> Result<JsonValue, ResolveError> {
    match reference {
        Reference::Step { step, key, path } => {
            let result = ctx
                .prior
                .get(*step)
                .ok_or(ResolveError::UnresolvedStep { step: *step })?;
            let value = result
                .extracted
                .get(key)
                .ok_or_else(|| ResolveError::UnknownOutput {
                    step: *step,
                    key: key.clone(),
                })?;
            match path {
                None => Ok(value.clone()),
                Some(p) => p
                    .lookup(value)
                    .cloned()
                    .ok_or_else(|| ResolveError::MissingPath {
                        step: *step,
                        key: key.clone(),
                        path: p.to_string(),
                    }),
            }
        }
        Reference::Now(format) => {
            let rendered = match format {
                NowFormat::DateTime => ctx.now.format("%Y-%m-%d %H:%M:%S").to_string(),
                NowFormat::Date => ctx.now.format("%Y-%m-%d").to_string(),
            };
            Ok(JsonValue::String(rendered))
        }
        Reference::Env(name) => ctx
            .credentials
            .get(name)
            .map(|secret| JsonValue::String(secret.expose_secret().to_string()))
            .ok_or_else(|| ResolveError::UnknownCredential { name: name.clone() }),
    }
}

fn stringify(v: &JsonValue) -> String {
    match v {
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("step{step} has no recorded result")]
    UnresolvedStep { step: usize },

    #[error("step{step} did not extract an output named '{key}'")]
    UnknownOutput { step: usize, key: String },

    #[error("path '{path}' not found in step{step} output '{key}'")]
    MissingPath {
        step: usize,
        key: String,
        path: String,
    },

    #[error("unknown credential: {name}")]
    UnknownCredential { name: String },

    #[error("resolved url '{url}' is invalid: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("failed to serialize request body: {0}")]
    BodySerialize(String),
}
