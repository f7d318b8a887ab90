use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::field_path::{FieldPath, FieldPathError};

static ENV_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z0-9_]*$").expect("valid regex"));

static OUTPUT_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_\-]*$").expect("valid regex"));

/// A single `{{...}}` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// `stepN.key` or `stepN.key.sub.path` — a value extracted by an
    /// earlier step, optionally traversed further into.
    Step {
        step: usize,
        key: String,
        path: Option<FieldPath>,
    },
    /// `now` / `now.date` — the injected run timestamp.
    Now(NowFormat),
    /// `env.NAME` — a pre-configured credential or setting.
    Env(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NowFormat {
    /// `YYYY-MM-DD HH:MM:SS`
    DateTime,
    /// `YYYY-MM-DD`
    Date,
}

impl Reference {
    /// The step this reference depends on, if any.
    pub fn step_id(&self) -> Option<usize> {
        match self {
            Reference::Step { step, .. } => Some(*step),
            _ => None,
        }
    }
}

pub fn parse_reference(input: &str) -> Result<Reference, ReferenceError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(ReferenceError::Empty);
    }

    if s == "now" {
        return Ok(Reference::Now(NowFormat::DateTime));
    }
    if s == "now.date" {
        return Ok(Reference::Now(NowFormat::Date));
    }

    if let Some(name) = s.strip_prefix("env.") {
        if name.is_empty() {
            return Err(ReferenceError::Empty);
        }
        if !ENV_NAME_RE.is_match(name) {
            return Err(ReferenceError::InvalidEnvName(name.to_string()));
        }
        return Ok(Reference::Env(name.to_string()));
    }

    if let Some(rest) = s.strip_prefix("step") {
        let Some((ordinal, rest)) = rest.split_once('.') else {
            return Err(ReferenceError::MissingOutputKey(s.to_string()));
        };
        if ordinal.is_empty()
            || !ordinal.chars().all(|c| c.is_ascii_digit())
            || (ordinal.len() > 1 && ordinal.starts_with('0'))
        {
            return Err(ReferenceError::InvalidStepOrdinal(ordinal.to_string()));
        }
        let step: usize = ordinal
            .parse()
            .map_err(|_| ReferenceError::InvalidStepOrdinal(ordinal.to_string()))?;

        let (key, path) = match rest.split_once('.') {
            Some((key, remainder)) => (key, Some(FieldPath::parse(remainder)?)),
            None => (rest, None),
        };
        if !OUTPUT_KEY_RE.is_match(key) {
            return Err(ReferenceError::MissingOutputKey(s.to_string()));
        }
        return Ok(Reference::Step {
            step,
            key: key.to_string(),
            path,
        });
    }

    Err(ReferenceError::UnknownReference(s.to_string()))
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Step { step, key, path } => {
                write!(f, "step{step}.{key}")?;
                if let Some(path) = path {
                    write!(f, ".{path}")?;
                }
                Ok(())
            }
            Reference::Now(NowFormat::DateTime) => f.write_str("now"),
            Reference::Now(NowFormat::Date) => f.write_str("now.date"),
            Reference::Env(name) => write!(f, "env.{name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReferenceError {
    #[error("reference must not be empty")]
    Empty,
    #[error("unknown reference: {0}")]
    UnknownReference(String),
    #[error("invalid step ordinal: step{0}")]
    InvalidStepOrdinal(String),
    #[error("step reference must name an output key: {0}")]
    MissingOutputKey(String),
    #[error("invalid env name: {0}")]
    InvalidEnvName(String),
    #[error(transparent)]
    Path(#[from] FieldPathError),
}
