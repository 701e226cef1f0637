//! Quote Source Port - Where Swap Quotes Come From
//!
//! Defines the trait the reporting use case depends on, plus the
//! error type every implementation reports failures with.
//!
//! Failures are terminal: no retries and no partial results. A
//! caller either gets all three required fields or an error.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::quote::{QuoteRequest, QuoteResults};

/// Why a quote could not be obtained.
#[derive(Debug, Error)]
pub enum QuoteError {
  /// The external program could not be started.
  #[error("failed to start `{program}`: {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  /// Reading the program's output failed.
  #[error("failed to collect output of `{program}`: {source}")]
  Io {
    program: String,
    #[source]
    source: std::io::Error,
  },

  /// The program ran past its deadline and was killed.
  #[error("`{program}` did not finish within {}s", .timeout.as_secs())]
  Timeout { program: String, timeout: Duration },

  /// The program exited unsuccessfully.
  #[error("`{program}` exited with {}: {stderr}", exit_label(.code))]
  NonZeroExit {
    program: String,
    /// Exit code, `None` when terminated by a signal.
    code: Option<i32>,
    /// Trimmed standard error.
    stderr: String,
  },

  /// Standard output was not UTF-8.
  #[error("quote output is not valid UTF-8")]
  NonUtf8Output,

  /// Standard output was blank.
  #[error("quote output is empty")]
  EmptyOutput,

  /// Standard output was not JSON.
  #[error("quote output is not valid JSON: {0}")]
  MalformedJson(#[from] serde_json::Error),

  /// The JSON document is not an object.
  #[error("quote output must be a JSON object, got {0}")]
  NotAnObject(&'static str),

  /// A required key is absent.
  #[error("quote output is missing `{0}`")]
  MissingField(&'static str),
}

fn exit_label(code: &Option<i32>) -> String {
  code.map_or_else(|| "a signal".to_string(), |c| format!("status {c}"))
}

/// Trait for quote providers.
///
/// Implementors turn a validated [`QuoteRequest`] into the quote
/// document. The production implementation shells out to the CoW
/// Protocol trading CLI; tests substitute mocks.
#[async_trait]
pub trait QuoteSource: Send + Sync + 'static {
  /// Fetch a single quote.
  ///
  /// # Errors
  /// Any [`QuoteError`]; implementations must not return partial data.
  async fn fetch_quote(&self, request: &QuoteRequest) -> Result<QuoteResults, QuoteError>;

  /// Short human-readable name for logs.
  fn name(&self) -> String;
}
