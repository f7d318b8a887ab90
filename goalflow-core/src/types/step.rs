use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

use crate::types::Method;

/// One planned HTTP call. String fields and string leaves of `body` may
/// carry `{{...}}` references to outputs of earlier steps.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Step {
    /// Ordinal position within the plan; equals the step's index.
    pub id: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub method: Method,

    pub url: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub query: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<JsonValue>,

    /// Output key -> field path into the response body, e.g.
    /// `temperature -> main.temp`. An empty mapping is valid.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extract: BTreeMap<String, String>,
}

impl Step {
    pub fn new(id: usize, method: Method, url: impl Into<String>) -> Self {
        Self {
            id,
            description: None,
            method,
            url: url.into(),
            query: BTreeMap::new(),
            headers: BTreeMap::new(),
            body: None,
            extract: BTreeMap::new(),
        }
    }
}
