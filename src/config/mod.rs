//! Configuration Module - TOML-based Runner Configuration
//!
//! Loads and validates configuration from `config.toml` with
//! environment variable overrides for secrets. Every value passed to
//! the trading CLI lives here - nothing is hardcoded in the domain
//! layer.

pub mod loader;

use serde::Deserialize;

use crate::domain::trade::{ChainId, CowEnv, OrderKind};

/// Top-level runner configuration.
///
/// Loaded from `config.toml` at startup and validated before the
/// trading CLI is invoked.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Runner identity and logging.
  #[serde(default)]
  pub runner: RunnerConfig,
  /// How to launch the trading CLI.
  #[serde(default)]
  pub cli: CliConfig,
  /// Quote parameters handed to the CLI.
  pub quote: QuoteConfig,
}

/// Runner identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RunnerConfig {
  /// Human-readable runner name.
  #[serde(default = "default_name")]
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

impl Default for RunnerConfig {
  fn default() -> Self {
    Self {
      name: default_name(),
      log_level: default_log_level(),
    }
  }
}

/// Trading CLI launch configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
  /// Executable to run.
  #[serde(default = "default_program")]
  pub program: String,
  /// Arguments before the quote flags.
  #[serde(default = "default_prefix_args")]
  pub prefix_args: Vec<String>,
  /// Working directory (the SDK checkout when running through yarn).
  pub working_dir: Option<String>,
  /// Invocation deadline in seconds.
  #[serde(default = "default_timeout")]
  pub timeout_seconds: u64,
}

impl Default for CliConfig {
  fn default() -> Self {
    Self {
      program: default_program(),
      prefix_args: default_prefix_args(),
      working_dir: None,
      timeout_seconds: default_timeout(),
    }
  }
}

/// Quote parameters as written in `config.toml`.
///
/// Addresses and amounts stay strings here; `loader` parses them into
/// domain types and reports which field is wrong.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteConfig {
  /// EIP-155 chain id.
  pub chain_id: ChainId,
  /// Signer private key. Prefer `COW_SIGNER_PRIVATE_KEY`.
  #[serde(default)]
  pub signer_private_key: SecretString,
  /// App code for analytics.
  #[serde(default = "default_app_code")]
  pub app_code: String,
  /// Sell or buy.
  pub kind: OrderKind,
  /// Sell token address.
  pub sell_token: String,
  /// Sell token decimals.
  pub sell_token_decimals: u8,
  /// Buy token address.
  pub buy_token: String,
  /// Buy token decimals.
  pub buy_token_decimals: u8,
  /// Amount in atoms. Exclusive with `amount_units`.
  pub amount: Option<String>,
  /// Amount in human units (e.g. "0.12"), scaled by the relevant decimals.
  pub amount_units: Option<String>,
  /// Order book environment.
  #[serde(default)]
  pub env: CowEnv,
  /// Allow partial fills.
  #[serde(default)]
  pub partially_fillable: bool,
  /// Slippage in bps; absent = let the CLI suggest one.
  pub slippage_bps: Option<u32>,
  /// Receiver address; empty = the signer.
  #[serde(default)]
  pub receiver: String,
  /// Order lifetime in seconds.
  #[serde(default = "default_valid_for")]
  pub valid_for_seconds: u32,
  /// Partner fee in bps.
  #[serde(default)]
  pub partner_fee_bps: u32,
  /// Partner fee recipient; required when `partner_fee_bps > 0`.
  #[serde(default)]
  pub partner_fee_recipient: String,
}

/// String that never shows up in `Debug` output.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SecretString(String);

impl SecretString {
  /// The secret value.
  pub fn expose(&self) -> &str {
    &self.0
  }

  /// Whether the secret is blank.
  pub fn is_blank(&self) -> bool {
    self.0.trim().is_empty()
  }
}

impl From<String> for SecretString {
  fn from(value: String) -> Self {
    Self(value)
  }
}

impl std::fmt::Debug for SecretString {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    if self.is_blank() {
      f.write_str("\"\"")
    } else {
      f.write_str("<redacted>")
    }
  }
}

// Default value functions for serde

fn default_name() -> String {
  "cow-quote-runner".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_program() -> String {
  "yarn".to_string()
}

fn default_prefix_args() -> Vec<String> {
  ["run", "run-cli", "--silent", "--"]
    .into_iter()
    .map(String::from)
    .collect()
}

const fn default_timeout() -> u64 {
  30
}

fn default_app_code() -> String {
  "cow-quote-runner".to_string()
}

const fn default_valid_for() -> u32 {
  300
}
