use std::collections::BTreeMap;

use goalflow_core::{RequestSnapshot, Step};

use crate::executor::http::HttpRequestParts;
use crate::executor::resolve::{resolve_string, resolve_value, ResolveContext, ResolveError};

pub struct RequestBuildResult {
    /// What gets recorded: the request exactly as sent.
    pub snapshot: RequestSnapshot,
    pub parts: HttpRequestParts,
}

/// Resolve a step's templates into a concrete outbound request. No network
/// I/O happens here; any failure surfaces as the step's template error.
pub fn build_request(
    step: &Step,
    ctx: &ResolveContext<'_>,
) -> Result<RequestBuildResult, ResolveError> {
    let raw_url = resolve_string(&step.url, ctx)?;
    let mut url = url::Url::parse(&raw_url).map_err(|e| ResolveError::InvalidUrl {
        url: raw_url.clone(),
        message: e.to_string(),
    })?;

    let mut query = Vec::with_capacity(step.query.len());
    for (name, value) in &step.query {
        query.push((name.clone(), resolve_string(value, ctx)?));
    }
    if !query.is_empty() {
        let mut qp = url.query_pairs_mut();
        for (name, value) in &query {
            qp.append_pair(name, value);
        }
    }

    let mut headers = BTreeMap::new();
    for (name, value) in &step.headers {
        headers.insert(name.clone(), resolve_string(value, ctx)?);
    }

    let body = step
        .body
        .as_ref()
        .map(|b| resolve_value(b, ctx))
        .transpose()?;
    let body_bytes = match &body {
        Some(v) => serde_json::to_vec(v).map_err(|e| ResolveError::BodySerialize(e.to_string()))?,
        None => Vec::new(),
    };

    if body.is_some() && !headers.keys().any(|k| k.eq_ignore_ascii_case("content-type")) {
        headers.insert("Content-Type".to_string(), "application/json".to_string());
    }

    let snapshot = RequestSnapshot {
        method: step.method,
        url: url.to_string(),
        headers: headers.clone(),
        body,
    };

    Ok(RequestBuildResult {
        snapshot,
        parts: HttpRequestParts {
            method: step.method,
            url,
            headers,
            body: body_bytes,
        },
    })
}
