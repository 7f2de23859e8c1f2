//! Data returned by the backend: extracted text and the analysis result.
//!
//! The analysis payload's `entities` and `sentiment` fields are free-form JSON
//! (whatever the model decided to return). Instead of carrying an untyped
//! object graph around, they are converted once into [`Structured`], a small
//! tagged variant that the renderer can walk with plain structural recursion.

use crate::error::{DocAnalyzerError, Endpoint};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Text extracted from an uploaded document by `POST /api/upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedText(String);

impl ExtractedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ExtractedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A display-oriented view of an arbitrary JSON value.
///
/// Numbers and booleans collapse into [`Structured::Scalar`] using their JSON
/// spelling; `null` becomes [`Structured::Absent`]. Mapping entries keep the
/// order the server sent them in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Structured {
    #[default]
    Absent,
    Scalar(String),
    List(Vec<Structured>),
    Mapping(Vec<(String, Structured)>),
}

impl Structured {
    pub fn is_absent(&self) -> bool {
        matches!(self, Structured::Absent)
    }

    /// Look up a key of a mapping. Returns `None` for every other variant.
    pub fn get(&self, key: &str) -> Option<&Structured> {
        match self {
            Structured::Mapping(entries) => {
                entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
            }
            _ => None,
        }
    }
}

impl From<&Value> for Structured {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Structured::Absent,
            Value::Bool(b) => Structured::Scalar(b.to_string()),
            Value::Number(n) => Structured::Scalar(n.to_string()),
            Value::String(s) => Structured::Scalar(s.clone()),
            Value::Array(items) => Structured::List(items.iter().map(Structured::from).collect()),
            Value::Object(map) => Structured::Mapping(
                map.iter()
                    .map(|(k, v)| (k.clone(), Structured::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for Structured {
    fn from(value: Value) -> Self {
        Structured::from(&value)
    }
}

/// The structured analysis returned by `POST /api/analyze`.
///
/// `summary` and `analysis` are required strings; a 2xx response without them
/// is rejected as [`DocAnalyzerError::MalformedResponse`]. `entities` and
/// `sentiment` may be missing and then render as `N/A`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub summary: String,
    pub entities: Structured,
    pub sentiment: Structured,
    pub analysis: String,
    raw: Value,
}

impl AnalysisResult {
    /// Validate a response body and build the typed view over it.
    pub fn from_value(raw: Value) -> Result<Self, DocAnalyzerError> {
        let Value::Object(ref body) = raw else {
            return Err(malformed(format!(
                "expected a JSON object, got {}",
                json_type_name(&raw)
            )));
        };

        let summary = required_string(body, "summary")?;
        let analysis = required_string(body, "analysis")?;
        let entities = body.get("entities").map(Structured::from).unwrap_or_default();
        let sentiment = body.get("sentiment").map(Structured::from).unwrap_or_default();

        Ok(Self {
            summary,
            entities,
            sentiment,
            analysis,
            raw,
        })
    }

    /// The complete response body as received.
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

fn required_string(
    body: &serde_json::Map<String, Value>,
    field: &str,
) -> Result<String, DocAnalyzerError> {
    match body.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(malformed(format!(
            "field '{field}' must be a string, got {}",
            json_type_name(other)
        ))),
        None => Err(malformed(format!("missing field '{field}'"))),
    }
}

fn malformed(detail: String) -> DocAnalyzerError {
    DocAnalyzerError::MalformedResponse {
        endpoint: Endpoint::Analyze,
        detail,
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
