//! CoW Quote Runner — Entry Point
//!
//! Runs the CoW Protocol trading CLI once for the configured swap and
//! prints `orderToSign`, `amountsAndCosts` and `quoteResponse` from
//! the quote it returns.
//!
//! Wiring sequence:
//! 1. Read config.toml (log level only, nothing validated yet)
//! 2. Init tracing (JSON structured logging on stderr)
//!    then apply COW_SIGNER_PRIVATE_KEY and validate
//! 3. Build the QuoteRequest from the [quote] section
//! 4. Create CliQuoteSource (QuoteSource port over a subprocess)
//! 5. Run QuoteReporter, writing the report to stdout
//! 6. Any failure → non-zero exit, nothing on stdout

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use cow_quote_runner::adapters::cli::CliQuoteSource;
use cow_quote_runner::config::loader;
use cow_quote_runner::domain::trade::checksummed;
use cow_quote_runner::usecases::quote_report::QuoteReporter;

/// Environment variable pointing at the config file.
const CONFIG_PATH_ENV: &str = "COW_QUOTE_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_PATH_ENV).ok())
        .unwrap_or_else(|| "config.toml".to_string());
    let config = loader::read_config(&config_path)
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging (stderr) ──────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(&config.runner.log_level)
                }),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = loader::prepare_config(config, |key| std::env::var(key).ok())
        .context("Invalid configuration")?;

    let run_id = Uuid::new_v4();
    let span = info_span!("quote_run", %run_id);

    async move {
        info!(
            name = %config.runner.name,
            version = env!("CARGO_PKG_VERSION"),
            config = %config_path,
            "Starting CoW quote runner"
        );

        // ── 3. Quote request ────────────────────────────────
        let request = loader::quote_request(&config.quote)
            .context("Invalid [quote] configuration")?;
        info!(
            owner = %checksummed(&request.signer.address()),
            chain = %request.chain_id,
            kind = %request.kind,
            amount = %request.amount,
            "Quote request prepared"
        );

        // ── 4. Trading CLI adapter (QuoteSource port) ───────
        let source = Arc::new(CliQuoteSource::new(loader::cli_source_config(&config.cli)));

        // ── 5. Fetch and print ──────────────────────────────
        let reporter = QuoteReporter::new(source);
        let mut stdout = std::io::stdout();
        match reporter.report(&request, &mut stdout).await {
            Ok(_) => {
                info!("Quote run complete");
                Ok(())
            }
            Err(e) => {
                error!(error = %format!("{e:#}"), "Quote run failed");
                Err(e)
            }
        }
    }
    .instrument(span)
    .await
}
