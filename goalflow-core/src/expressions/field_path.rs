use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value as JsonValue;

static KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_\-]+$").expect("valid regex"));

/// Dot-separated path into a JSON value, e.g. `main.temp` or
/// `weather.0.description`. All-digit segments index into arrays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    pub segments: Vec<PathSegment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl FieldPath {
    pub fn parse(input: &str) -> Result<Self, FieldPathError> {
        if input.is_empty() {
            return Err(FieldPathError::Empty);
        }

        let mut segments = Vec::new();
        for part in input.split('.') {
            if part.is_empty() {
                return Err(FieldPathError::EmptySegment);
            }
            if part.chars().all(|c| c.is_ascii_digit()) {
                let idx: usize = part
                    .parse()
                    .map_err(|_| FieldPathError::InvalidSegment(part.to_string()))?;
                segments.push(PathSegment::Index(idx));
            } else if KEY_RE.is_match(part) {
                segments.push(PathSegment::Key(part.to_string()));
            } else {
                return Err(FieldPathError::InvalidSegment(part.to_string()));
            }
        }

        Ok(Self { segments })
    }

    pub fn lookup<'a>(&self, root: &'a JsonValue) -> Option<&'a JsonValue> {
        let mut cur = root;
        for seg in &self.segments {
            cur = match seg {
                PathSegment::Key(k) => cur.get(k.as_str())?,
                PathSegment::Index(i) => cur.get(*i)?,
            };
        }
        Some(cur)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            match seg {
                PathSegment::Key(k) => f.write_str(k)?,
                PathSegment::Index(idx) => write!(f, "{idx}")?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldPathError {
    #[error("field path must not be empty")]
    Empty,
    #[error("field path segment must not be empty")]
    EmptySegment,
    #[error("invalid field path segment: {0}")]
    InvalidSegment(String),
}
