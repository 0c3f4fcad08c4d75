//! Turns loosely formatted vision-model output into a JSON analysis.
//!
//! Models asked for JSON often wrap it in markdown fences or surround it with
//! prose. Normalization tolerates both:
//!
//! 1. Structured output (object or array) is serialized unchanged.
//! 2. Text is trimmed and stripped of a ```` ```json ```` / ```` ``` ```` fence.
//! 3. The span from the first `{` to the last `}` is parsed; without such a
//!    span the whole remaining text is parsed.
//! 4. A parsed object missing `healthiness` receives `"N/A"`.
//! 5. The result is re-serialized as compact JSON.
//!
//! Parse failures carry the parser message and the first 200 characters of
//! the text that was parsed.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::entities::ModelOutput;
use crate::domain::entities::meal::UNKNOWN_HEALTHINESS;

/// Maximum number of characters of model output kept in error messages.
pub const SNIPPET_LEN: usize = 200;

const HEALTHINESS_KEY: &str = "healthiness";

/// Which part of the text was handed to the JSON parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate {
    /// The span between the first `{` and the last `}`.
    BraceSpan,
    /// The whole text, after trimming and fence removal.
    WholeText,
}

impl Candidate {
    fn describe(&self) -> &'static str {
        match self {
            Candidate::BraceSpan => "extracted JSON object",
            Candidate::WholeText => "output without braces",
        }
    }
}

/// Why model output could not be normalized.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NormalizeError {
    #[error("could not parse {} from vision model output: {message}. Snippet: {snippet}", .candidate.describe())]
    InvalidJson {
        candidate: Candidate,
        message: String,
        snippet: String,
    },

    #[error("vision model output parsed to a JSON {kind}, expected an object. Snippet: {snippet}")]
    NotAnObject { kind: &'static str, snippet: String },

    #[error("unexpected structured output from vision model: JSON {kind}. Snippet: {snippet}")]
    UnexpectedShape { kind: &'static str, snippet: String },
}

/// Normalizes model output into a compact JSON string.
///
/// # Errors
///
/// See [`normalize_value`].
pub fn normalize(output: ModelOutput) -> Result<String, NormalizeError> {
    normalize_value(output).map(|value| value.to_string())
}

/// Normalizes model output into a JSON value.
///
/// # Errors
///
/// - [`NormalizeError::InvalidJson`] if the text does not parse
/// - [`NormalizeError::NotAnObject`] if text parses to something other than an object
/// - [`NormalizeError::UnexpectedShape`] if structured output is a scalar
pub fn normalize_value(output: ModelOutput) -> Result<Value, NormalizeError> {
    match output {
        ModelOutput::Structured(value @ (Value::Object(_) | Value::Array(_))) => Ok(value),
        ModelOutput::Structured(other) => Err(NormalizeError::UnexpectedShape {
            kind: json_kind(&other),
            snippet: snippet(&other.to_string()),
        }),
        ModelOutput::Text(text) => normalize_text(&text),
    }
}

fn normalize_text(raw: &str) -> Result<Value, NormalizeError> {
    debug!(raw_output = %snippet_of(raw, 500), "Normalizing vision model text output");

    let text = strip_code_fence(raw.trim());

    let (candidate, source) = match brace_span(text) {
        Some(span) => (Candidate::BraceSpan, span),
        None => (Candidate::WholeText, text),
    };

    let parsed: Value = serde_json::from_str(source).map_err(|e| {
        let err = NormalizeError::InvalidJson {
            candidate,
            message: e.to_string(),
            snippet: snippet(source),
        };
        warn!("{err}");
        err
    })?;

    match parsed {
        Value::Object(object) => Ok(Value::Object(ensure_healthiness(object))),
        other => Err(NormalizeError::NotAnObject {
            kind: json_kind(&other),
            snippet: snippet(source),
        }),
    }
}

fn ensure_healthiness(mut object: Map<String, Value>) -> Map<String, Value> {
    debug!(keys = ?object.keys().collect::<Vec<_>>(), "Parsed analysis keys");

    match object.get(HEALTHINESS_KEY) {
        Some(label) => info!(healthiness = %label, "Analysis includes healthiness"),
        None => {
            info!("Analysis has no healthiness, defaulting to {UNKNOWN_HEALTHINESS}");
            object.insert(
                HEALTHINESS_KEY.to_string(),
                Value::String(UNKNOWN_HEALTHINESS.to_string()),
            );
        }
    }

    object
}

/// Removes a surrounding ```` ```json ```` or ```` ``` ```` fence.
///
/// Text that does not both start and end with a fence is returned unchanged.
pub fn strip_code_fence(text: &str) -> &str {
    let inner = text
        .strip_prefix("```json")
        .and_then(|rest| rest.strip_suffix("```"))
        .or_else(|| {
            text.strip_prefix("```")
                .and_then(|rest| rest.strip_suffix("```"))
        });

    match inner {
        Some(inner) => inner.trim(),
        None => text,
    }
}

/// Returns the span from the first `{` through the last `}`, if the last
/// brace follows the first.
pub fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn snippet(text: &str) -> String {
    snippet_of(text, SNIPPET_LEN)
}

fn snippet_of(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
