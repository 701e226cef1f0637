//! Trading CLI Output Parser
//!
//! The CLI prints one JSON object on stdout. Surrounding whitespace is
//! tolerated; anything else (log lines, progress bars, several
//! documents) is treated as malformed output.

use serde_json::Value;

use crate::domain::quote::QuoteResults;
use crate::ports::quote_source::QuoteError;

/// Parse captured stdout into a quote document.
///
/// # Errors
/// `NonUtf8Output`, `EmptyOutput`, `MalformedJson`, `NotAnObject` or
/// `MissingField`, checked in that order.
pub fn parse_quote_output(stdout: &[u8]) -> Result<QuoteResults, QuoteError> {
  let text = std::str::from_utf8(stdout).map_err(|_| QuoteError::NonUtf8Output)?;
  let text = text.trim();
  if text.is_empty() {
    return Err(QuoteError::EmptyOutput);
  }

  match serde_json::from_str::<Value>(text)? {
    Value::Object(object) => QuoteResults::from_object(object).map_err(QuoteError::MissingField),
    other => Err(QuoteError::NotAnObject(json_kind(&other))),
  }
}

const fn json_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}
