use std::collections::BTreeMap;

use goalflow_core::expressions::FieldPath;
use serde_json::Value as JsonValue;

use crate::executor::http::HttpResponseParts;

pub fn parse_body_json(resp: &HttpResponseParts) -> Option<JsonValue> {
    let s = std::str::from_utf8(&resp.body).ok()?;
    serde_json::from_str(s).ok()
}

/// Apply a step's `extract` mapping to the parsed response body.
pub fn extract_outputs(
    extract: &BTreeMap<String, String>,
    body_json: Option<&JsonValue>,
) -> Result<BTreeMap<String, JsonValue>, ExtractError> {
    if extract.is_empty() {
        return Ok(BTreeMap::new());
    }

    let body = body_json.ok_or(ExtractError::BodyNotJson)?;

    let mut out = BTreeMap::new();
    for (key, raw_path) in extract {
        let path = FieldPath::parse(raw_path).map_err(|_| ExtractError::MissingPath {
            key: key.clone(),
            path: raw_path.clone(),
        })?;
        let value = path.lookup(body).ok_or_else(|| ExtractError::MissingPath {
            key: key.clone(),
            path: raw_path.clone(),
        })?;
        out.insert(key.clone(), value.clone());
    }
    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("step declares extractions but the response body is not JSON")]
    BodyNotJson,
    #[error("path '{path}' for output '{key}' not found in response body")]
    MissingPath { key: String, path: String },
}
