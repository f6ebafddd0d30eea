//! Query-string parameters.
//!
//! Entries keep insertion order.  Only two values are ever dropped from the
//! output: [`QueryValue::Undefined`] and the empty string.  `null` and
//! `false` are real values; list endpoints use them as "next page" cursors.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// A single query-string value.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    /// Present in the mapping but not set; never serialized.
    Undefined,
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    /// Serialized as one `key=element` pair per element, in order.
    List(Vec<String>),
}

impl QueryValue {
    /// Whether this entry is left out of the query string entirely.
    pub fn is_omitted(&self) -> bool {
        match self {
            QueryValue::Undefined => true,
            QueryValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

/// Formats a float the way JavaScript's `String(n)` does.
///
/// Magnitudes at or above `1e21` and below `1e-6` use exponent form with an
/// explicit sign (`1e+21`, `1.5e-7`); everything else is positional.
fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f == f64::INFINITY {
        "Infinity".to_string()
    } else if f == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if f == 0.0 {
        // Covers -0.0.
        "0".to_string()
    } else if f.abs() >= 1e21 || f.abs() < 1e-6 {
        let exp = format!("{f:e}");
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                format!("{mantissa}e+{power}")
            }
            _ => exp,
        }
    } else {
        // Shortest round-trip digits, without a trailing `.0`.
        format!("{f}")
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Undefined => f.write_str("undefined"),
            QueryValue::Null => f.write_str("null"),
            QueryValue::Bool(b) => write!(f, "{b}"),
            QueryValue::Integer(n) => write!(f, "{n}"),
            QueryValue::Float(x) => f.write_str(&format_float(*x)),
            QueryValue::Text(s) => f.write_str(s),
            QueryValue::List(items) => f.write_str(&items.join(",")),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::Text(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::Text(s)
    }
}

impl From<bool> for QueryValue {
    fn from(b: bool) -> Self {
        QueryValue::Bool(b)
    }
}

impl From<i64> for QueryValue {
    fn from(n: i64) -> Self {
        QueryValue::Integer(n)
    }
}

impl From<u32> for QueryValue {
    fn from(n: u32) -> Self {
        QueryValue::Integer(n.into())
    }
}

impl From<f64> for QueryValue {
    fn from(x: f64) -> Self {
        QueryValue::Float(x)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(v: Vec<String>) -> Self {
        QueryValue::List(v)
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(v: Vec<&str>) -> Self {
        QueryValue::List(v.into_iter().map(str::to_string).collect())
    }
}

/// `None` maps to [`QueryValue::Undefined`], i.e. "leave it out".
impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(QueryValue::Undefined, Into::into)
    }
}

/// Error for query input that has no query-string form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct InvalidQuery(pub String);

fn scalar_to_string(key: &str, v: &Value) -> Result<String, InvalidQuery> {
    match v {
        Value::Null => Ok("null".to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(match n.as_i64() {
            Some(i) => i.to_string(),
            None => format_float(n.as_f64().unwrap_or(f64::NAN)),
        }),
        Value::String(s) => Ok(s.clone()),
        Value::Array(_) | Value::Object(_) => Err(InvalidQuery(format!(
            "query parameter '{key}' contains a nested value"
        ))),
    }
}

/// Ordered query parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    entries: Vec<(String, QueryValue)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.push(key, value);
        self
    }

    /// Appends an entry.  Repeated keys are kept; all of them are serialized.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.entries.push((key.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The `(key, value)` pairs that end up in the query string, in order.
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        for (key, value) in &self.entries {
            match value {
                v if v.is_omitted() => {}
                QueryValue::List(items) => {
                    out.extend(items.iter().map(|item| (key.clone(), item.clone())));
                }
                v => out.push((key.clone(), v.to_string())),
            }
        }
        out
    }

    /// Build from a JSON object, keeping key order.
    ///
    /// Arrays become [`QueryValue::List`]; their elements must be scalars.
    pub fn from_json(value: &Value) -> Result<Self, InvalidQuery> {
        let map = match value {
            Value::Object(map) => map,
            Value::Null => return Ok(Self::new()),
            other => {
                return Err(InvalidQuery(format!(
                    "query parameters must be a JSON object, got {other}"
                )))
            }
        };

        let mut params = Self::new();
        for (key, v) in map {
            let value = match v {
                Value::Null => QueryValue::Null,
                Value::Bool(b) => QueryValue::Bool(*b),
                Value::Number(n) => match n.as_i64() {
                    Some(i) => QueryValue::Integer(i),
                    None => QueryValue::Float(n.as_f64().unwrap_or(f64::NAN)),
                },
                Value::String(s) => QueryValue::Text(s.clone()),
                Value::Array(items) => QueryValue::List(
                    items
                        .iter()
                        .map(|item| scalar_to_string(key, item))
                        .collect::<Result<_, _>>()?,
                ),
                Value::Object(_) => {
                    return Err(InvalidQuery(format!(
                        "query parameter '{key}' contains a nested object"
                    )))
                }
            };
            params.push(key.clone(), value);
        }
        Ok(params)
    }
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (k, v) in iter {
            params.push(k, v);
        }
        params
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
