//! Validation of the per-query parameter map.
//!
//! The host hands over an opaque JSON object. It is checked once, when the
//! query is compiled, and turned into an immutable [`ScoreParameters`] that
//! every segment scorer shares.

use serde_json::{Map, Value};

use crate::distance::{DistanceMethod, norm_squared};
use crate::error::{Result, VecScoreError};
use crate::util::binary_string::to_binary_string;

pub const PARAM_FIELD: &str = "field";
pub const PARAM_METHOD: &str = "method";
pub const PARAM_VECTOR: &str = "vector";
pub const PARAM_VALUE: &str = "value";
pub const PARAM_COSINE: &str = "cosine";
pub const PARAM_EXCLUDE: &str = "exclude";

/// The query bound to the method that scores it.
///
/// Built once during validation, so the scorer never sees a method paired
/// with the wrong kind of query.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundQuery {
    /// Query doubles with their precomputed sum of squares.
    Cosine { vector: Vec<f64>, norm: f64 },
    Dot(Vec<f64>),
    L2(Vec<f64>),
    /// UTF-16 code units compared position by position.
    Hamming(Vec<u16>),
}

impl BoundQuery {
    pub fn method(&self) -> DistanceMethod {
        match self {
            BoundQuery::Cosine { .. } => DistanceMethod::Cosine,
            BoundQuery::Dot(_) => DistanceMethod::Dot,
            BoundQuery::L2(_) => DistanceMethod::L2,
            BoundQuery::Hamming(_) => DistanceMethod::Hamming,
        }
    }

    /// Number of elements a matching stored vector must hold.
    pub fn len(&self) -> usize {
        match self {
            BoundQuery::Cosine { vector, .. } | BoundQuery::Dot(vector) | BoundQuery::L2(vector) => {
                vector.len()
            }
            BoundQuery::Hamming(chars) => chars.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Validated, query-scoped scoring parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreParameters {
    field: String,
    query: BoundQuery,
    cosine: bool,
    exclude: bool,
}

impl ScoreParameters {
    /// Validate a raw parameter map.
    ///
    /// `method` overrides the map's own `method` entry. When neither is set
    /// the `cosine` flag picks between cosine (`true`, the default) and dot.
    pub fn validate(params: &Map<String, Value>, method: Option<DistanceMethod>) -> Result<Self> {
        let field = match params.get(PARAM_FIELD) {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::String(_)) | None | Some(Value::Null) => {
                return Err(VecScoreError::config("Missing parameter [field]"));
            }
            Some(other) => {
                return Err(VecScoreError::config(format!(
                    "Parameter [field] must be a string, got {other}"
                )));
            }
        };

        let cosine = bool_param(params, PARAM_COSINE)?;
        let exclude = bool_param(params, PARAM_EXCLUDE)?;

        let method = match method {
            Some(m) => m,
            None => match params.get(PARAM_METHOD) {
                Some(Value::String(name)) => DistanceMethod::parse_str(name)?,
                Some(Value::Null) | None if cosine => DistanceMethod::Cosine,
                Some(Value::Null) | None => DistanceMethod::Dot,
                Some(other) => {
                    return Err(VecScoreError::config(format!(
                        "Parameter [method] must be a string, got {other}"
                    )));
                }
            },
        };

        let raw_query = match (non_null(params, PARAM_VECTOR), non_null(params, PARAM_VALUE)) {
            (Some(v), None) => (PARAM_VECTOR, v),
            (None, Some(v)) => (PARAM_VALUE, v),
            (Some(_), Some(_)) => {
                return Err(VecScoreError::config(
                    "Parameters 'vector' and 'value' are mutually exclusive",
                ));
            }
            (None, None) => {
                return Err(VecScoreError::config(
                    "Must have 'vector' or 'value' as a parameter",
                ));
            }
        };

        let query = match method {
            DistanceMethod::Cosine => {
                let vector = parse_numbers(raw_query)?;
                let norm = norm_squared(&vector);
                BoundQuery::Cosine { vector, norm }
            }
            DistanceMethod::Dot => BoundQuery::Dot(parse_numbers(raw_query)?),
            DistanceMethod::L2 => BoundQuery::L2(parse_numbers(raw_query)?),
            DistanceMethod::Hamming => BoundQuery::Hamming(parse_chars(raw_query)?),
        };

        Ok(ScoreParameters {
            field,
            query,
            cosine,
            exclude,
        })
    }

    /// Validate parameters given as a JSON value, which must be an object.
    pub fn from_json(params: &Value, method: Option<DistanceMethod>) -> Result<Self> {
        match params {
            Value::Object(map) => Self::validate(map, method),
            other => Err(VecScoreError::config(format!(
                "Script parameters must be an object, got {other}"
            ))),
        }
    }

    /// Name of the binary doc-values field holding stored vectors.
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn method(&self) -> DistanceMethod {
        self.query.method()
    }

    pub fn query(&self) -> &BoundQuery {
        &self.query
    }

    pub fn cosine(&self) -> bool {
        self.cosine
    }

    /// The `exclude` flag as supplied, defaulting to `true`. The scorer
    /// itself does not act on it; it is carried for the host.
    pub fn exclude(&self) -> bool {
        self.exclude
    }

    /// Precomputed sum of squares of the query vector (cosine only).
    pub fn query_norm(&self) -> Option<f64> {
        match self.query {
            BoundQuery::Cosine { norm, .. } => Some(norm),
            _ => None,
        }
    }

    /// Number of elements a stored vector must decode to.
    pub fn expected_len(&self) -> usize {
        self.query.len()
    }
}

fn non_null<'a>(params: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    match params.get(key) {
        None | Some(Value::Null) => None,
        Some(v) => Some(v),
    }
}

fn bool_param(params: &Map<String, Value>, key: &str) -> Result<bool> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(true),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(VecScoreError::config(format!(
            "Parameter [{key}] must be a boolean, got {other}"
        ))),
    }
}

fn parse_numbers((key, value): (&str, &Value)) -> Result<Vec<f64>> {
    let items = value.as_array().ok_or_else(|| {
        VecScoreError::config(format!("Parameter [{key}] must be an array of numbers"))
    })?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_f64().ok_or_else(|| {
                VecScoreError::config(format!(
                    "Parameter [{key}] element {i} is not a number: {item}"
                ))
            })
        })
        .collect()
}

fn parse_chars((key, value): (&str, &Value)) -> Result<Vec<u16>> {
    match value {
        Value::String(s) => Ok(s.encode_utf16().collect()),
        Value::Array(_) => {
            let numbers = parse_numbers((key, value))?;
            Ok(to_binary_string(&numbers).encode_utf16().collect())
        }
        other => Err(VecScoreError::config(format!(
            "Parameter [{key}] must be a string or an array of numbers, got {other}"
        ))),
    }
}
