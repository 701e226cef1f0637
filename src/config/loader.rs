//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, applying environment overrides,
//! validating all parameters, and turning the quote section into a
//! `QuoteRequest` with clear error messages for misconfiguration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::{AppConfig, CliConfig, QuoteConfig, SecretString};
use crate::adapters::cli::CliQuoteSourceConfig;
use crate::domain::quote::{PartnerFee, QuoteRequest, SignerKey};
use crate::domain::trade::{OrderKind, TokenAmount, checksummed, parse_address};

/// Environment variable overriding `quote.signer_private_key`.
pub const SIGNER_KEY_ENV: &str = "COW_SIGNER_PRIVATE_KEY";

/// Upper bound for any basis-point value (100%).
const MAX_BPS: u32 = 10_000;

/// Upper bound for the CLI deadline.
const MAX_TIMEOUT_SECONDS: u64 = 600;

/// Load and validate configuration from a TOML file.
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  load_config_with_env(path, |key| std::env::var(key).ok())
}

/// [`load_config`] with an injectable environment lookup.
///
/// # Errors
/// Same as [`load_config`].
pub fn load_config_with_env(
  path: &str,
  env: impl Fn(&str) -> Option<String>,
) -> Result<AppConfig> {
  prepare_config(read_config(path)?, env)
}

/// Read and parse the TOML file without overrides or validation.
///
/// Emits no log events, so it can run before tracing is installed
/// (the log level lives in the file).
///
/// # Errors
/// File read or TOML parse failures.
pub fn read_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Apply environment overrides to a parsed config and validate it.
///
/// # Errors
/// Any violated validation rule.
pub fn prepare_config(
  mut config: AppConfig,
  env: impl Fn(&str) -> Option<String>,
) -> Result<AppConfig> {
  apply_env_overrides(&mut config, env);
  validate_config(&config)?;

  info!(
    chain = %config.quote.chain_id,
    kind = %config.quote.kind,
    env = %config.quote.env,
    program = %config.cli.program,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Replace secrets with values from the environment when set.
fn apply_env_overrides(config: &mut AppConfig, env: impl Fn(&str) -> Option<String>) {
  if let Some(key) = env(SIGNER_KEY_ENV).filter(|k| !k.trim().is_empty()) {
    if !config.quote.signer_private_key.is_blank() {
      warn!("{SIGNER_KEY_ENV} overrides signer_private_key from config file");
    }
    config.quote.signer_private_key = SecretString::from(key);
  }
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - A runnable CLI with a sensible deadline
/// - A quote section that converts into a `QuoteRequest`
fn validate_config(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(
    !config.cli.program.trim().is_empty(),
    "cli.program must not be empty"
  );
  anyhow::ensure!(
    config.cli.timeout_seconds > 0 && config.cli.timeout_seconds <= MAX_TIMEOUT_SECONDS,
    "cli.timeout_seconds must be in (0, {MAX_TIMEOUT_SECONDS}], got {}",
    config.cli.timeout_seconds
  );

  quote_request(&config.quote).map(|_| ())
}

/// Build the CLI launch settings from the `[cli]` section.
pub fn cli_source_config(cli: &CliConfig) -> CliQuoteSourceConfig {
  CliQuoteSourceConfig {
    program: cli.program.clone(),
    prefix_args: cli.prefix_args.clone(),
    working_dir: cli.working_dir.as_ref().map(PathBuf::from),
    timeout: Duration::from_secs(cli.timeout_seconds),
  }
}

/// Convert the `[quote]` section into a validated `QuoteRequest`.
///
/// # Errors
/// Names the offending field for every rejected value.
pub fn quote_request(quote: &QuoteConfig) -> Result<QuoteRequest> {
  anyhow::ensure!(
    !quote.signer_private_key.is_blank(),
    "quote.signer_private_key is empty and {SIGNER_KEY_ENV} is not set"
  );
  let signer = SignerKey::parse(quote.signer_private_key.expose()).map_err(|e| anyhow!(e))?;

  anyhow::ensure!(
    !quote.app_code.trim().is_empty(),
    "quote.app_code must not be empty"
  );

  let sell_token = parse_address("quote.sell_token", &quote.sell_token).map_err(|e| anyhow!(e))?;
  let buy_token = parse_address("quote.buy_token", &quote.buy_token).map_err(|e| anyhow!(e))?;
  anyhow::ensure!(
    sell_token != buy_token,
    "quote.sell_token and quote.buy_token are both {}",
    checksummed(&sell_token)
  );

  let amount = amount(quote)?;
  anyhow::ensure!(!amount.is_zero(), "quote amount must be greater than zero");

  if let Some(bps) = quote.slippage_bps {
    anyhow::ensure!(
      bps <= MAX_BPS,
      "quote.slippage_bps must be at most {MAX_BPS}, got {bps}"
    );
  }

  let receiver = optional_address("quote.receiver", &quote.receiver)?;

  anyhow::ensure!(
    quote.valid_for_seconds > 0,
    "quote.valid_for_seconds must be positive"
  );

  let partner_fee = partner_fee(quote)?;

  Ok(QuoteRequest {
    chain_id: quote.chain_id,
    signer,
    app_code: quote.app_code.trim().to_string(),
    kind: quote.kind,
    sell_token,
    sell_token_decimals: quote.sell_token_decimals,
    buy_token,
    buy_token_decimals: quote.buy_token_decimals,
    amount,
    env: quote.env,
    partially_fillable: quote.partially_fillable,
    slippage_bps: quote.slippage_bps,
    receiver,
    valid_for_secs: quote.valid_for_seconds,
    partner_fee,
  })
}

/// Resolve `amount` / `amount_units` into atoms.
///
/// Human units scale by the sell token's decimals for sell orders and
/// the buy token's decimals for buy orders.
fn amount(quote: &QuoteConfig) -> Result<TokenAmount> {
  match (&quote.amount, &quote.amount_units) {
    (Some(atoms), None) => {
      TokenAmount::from_atoms(atoms).map_err(|e| anyhow!("quote.amount: {e}"))
    }
    (None, Some(units)) => {
      let units = Decimal::from_str_exact(units.trim())
        .with_context(|| format!("quote.amount_units {units:?} is not a decimal number"))?;
      let decimals = match quote.kind {
        OrderKind::Sell => quote.sell_token_decimals,
        OrderKind::Buy => quote.buy_token_decimals,
      };
      TokenAmount::from_units(units, decimals).map_err(|e| anyhow!("quote.amount_units: {e}"))
    }
    (Some(_), Some(_)) => Err(anyhow!(
      "set only one of quote.amount and quote.amount_units"
    )),
    (None, None) => Err(anyhow!(
      "one of quote.amount or quote.amount_units is required"
    )),
  }
}

fn optional_address(
  field: &str,
  value: &str,
) -> Result<Option<alloy::primitives::Address>> {
  if value.trim().is_empty() {
    return Ok(None);
  }
  parse_address(field, value)
    .map(Some)
    .map_err(|e| anyhow!(e))
}

fn partner_fee(quote: &QuoteConfig) -> Result<Option<PartnerFee>> {
  let recipient = optional_address("quote.partner_fee_recipient", &quote.partner_fee_recipient)?;

  if quote.partner_fee_bps == 0 {
    if recipient.is_some() {
      warn!("quote.partner_fee_recipient is set but partner_fee_bps is 0, ignoring it");
    }
    return Ok(None);
  }

  anyhow::ensure!(
    quote.partner_fee_bps <= MAX_BPS,
    "quote.partner_fee_bps must be at most {MAX_BPS}, got {}",
    quote.partner_fee_bps
  );
  let recipient = recipient.ok_or_else(|| {
    anyhow!("quote.partner_fee_recipient is required when partner_fee_bps > 0")
  })?;

  Ok(Some(PartnerFee {
    bps: quote.partner_fee_bps,
    recipient,
  }))
}
