//! Quote Report - Fetch a Quote and Print Its Key Fields
//!
//! Asks the `QuoteSource` for one quote and writes the three fields a
//! caller needs to act on it:
//! - `orderToSign`: the unsigned order
//! - `amountsAndCosts`: amounts after fees, network costs and slippage
//! - `quoteResponse`: the raw order book quote
//!
//! The report is rendered in full before anything is written, so a
//! failure never leaves partial output behind.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::domain::quote::{QuoteRequest, QuoteResults};
use crate::ports::quote_source::QuoteSource;

/// Fetches quotes through a port and prints them.
pub struct QuoteReporter<S: QuoteSource> {
  /// Quote port.
  source: Arc<S>,
}

impl<S: QuoteSource> QuoteReporter<S> {
  /// Create a new reporter.
  pub const fn new(source: Arc<S>) -> Self {
    Self { source }
  }

  /// Fetch one quote and write its labelled fields to `out`.
  ///
  /// Returns the full quote so callers can log or reuse it.
  ///
  /// # Errors
  /// Fetch failures and write failures. Nothing is written on a
  /// fetch failure.
  #[instrument(skip(self, request, out), fields(source = %self.source.name(), owner = %request.signer.address()))]
  pub async fn report<W: Write>(&self, request: &QuoteRequest, out: &mut W) -> Result<QuoteResults> {
    let results = self
      .source
      .fetch_quote(request)
      .await
      .with_context(|| format!("Failed to fetch quote from `{}`", self.source.name()))?;

    let rendered = render(&results)?;
    out
      .write_all(rendered.as_bytes())
      .and_then(|()| out.flush())
      .context("Failed to write quote report")?;

    info!(
      quote_id = ?results.quote_id(),
      extra_fields = results.extra.len(),
      fetched_at = %results.fetched_at,
      "Quote report written"
    );
    Ok(results)
  }
}

/// Render the labelled fields: a `label:` line, then the pretty JSON value.
///
/// # Errors
/// Only if a value cannot be serialized, which `serde_json::Value` never does
/// in practice.
pub fn render(results: &QuoteResults) -> Result<String> {
  let mut rendered = String::new();
  for (label, value) in results.labelled_fields() {
    let json = serde_json::to_string_pretty(value)
      .with_context(|| format!("Failed to serialize {label}"))?;
    rendered.push_str(label);
    rendered.push_str(":\n");
    rendered.push_str(&json);
    rendered.push('\n');
  }
  Ok(rendered)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_render_labels_in_order() {
    let results = QuoteResults::from_object(
      json!({
        "quoteResponse": {"id": 1},
        "orderToSign": {"kind": "sell"},
        "amountsAndCosts": {"isSell": true},
        "appDataInfo": {}
      })
      .as_object()
      .cloned()
      .unwrap(),
    )
    .unwrap();

    let rendered = render(&results).unwrap();
    assert_eq!(
      rendered,
      "orderToSign:\n{\n  \"kind\": \"sell\"\n}\n\
       amountsAndCosts:\n{\n  \"isSell\": true\n}\n\
       quoteResponse:\n{\n  \"id\": 1\n}\n"
    );
    assert!(!rendered.contains("appDataInfo"));
  }

  #[test]
  fn test_render_keeps_cli_digits_and_key_order() {
    let stdout = br#"{"orderToSign":{"sellAmount":120000000000000000000000,"kind":"sell","appData":"x"},"amountsAndCosts":{"isSell":true,"costs":{"networkFee":1}},"quoteResponse":{"quote":{"feeAmount":"5"},"id":9}}"#;
    let results = crate::adapters::cli::output::parse_quote_output(stdout).unwrap();

    let rendered = render(&results).unwrap();
    assert_eq!(
      rendered,
      "orderToSign:\n{\n  \"sellAmount\": 120000000000000000000000,\n  \"kind\": \"sell\",\n  \"appData\": \"x\"\n}\n\
       amountsAndCosts:\n{\n  \"isSell\": true,\n  \"costs\": {\n    \"networkFee\": 1\n  }\n}\n\
       quoteResponse:\n{\n  \"quote\": {\n    \"feeAmount\": \"5\"\n  },\n  \"id\": 9\n}\n"
    );
    assert!(!rendered.contains("e23"));
  }

  #[test]
  fn test_render_scalars() {
    let results = QuoteResults::from_object(
      json!({"orderToSign": "A", "amountsAndCosts": 2, "quoteResponse": null})
        .as_object()
        .cloned()
        .unwrap(),
    )
    .unwrap();
    assert_eq!(
      render(&results).unwrap(),
      "orderToSign:\n\"A\"\namountsAndCosts:\n2\nquoteResponse:\nnull\n"
    );
  }
}
