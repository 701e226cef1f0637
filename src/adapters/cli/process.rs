//! Trading CLI Process Adapter - `QuoteSource` over a Subprocess
//!
//! Spawns the CoW Protocol trading CLI with the quote arguments,
//! waits for it under a deadline, and hands stdout to the parser.
//! The child is killed if the deadline passes.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use super::args::{quote_args, redacted};
use super::output::parse_quote_output;
use crate::domain::quote::{QuoteRequest, QuoteResults};
use crate::ports::quote_source::{QuoteError, QuoteSource};

/// Longest stderr excerpt kept in errors and logs.
const MAX_STDERR_BYTES: usize = 4096;

/// How to launch the trading CLI.
#[derive(Debug, Clone)]
pub struct CliQuoteSourceConfig {
  /// Executable to run (looked up on `PATH` when not a path).
  pub program: String,
  /// Arguments placed before the quote flags (e.g. `run-cli --silent --`).
  pub prefix_args: Vec<String>,
  /// Working directory for the child, `None` to inherit.
  pub working_dir: Option<PathBuf>,
  /// Deadline for the whole invocation.
  pub timeout: Duration,
}

impl Default for CliQuoteSourceConfig {
  fn default() -> Self {
    Self {
      program: "yarn".to_string(),
      prefix_args: vec![
        "run".to_string(),
        "run-cli".to_string(),
        "--silent".to_string(),
        "--".to_string(),
      ],
      working_dir: None,
      timeout: Duration::from_secs(30),
    }
  }
}

/// `QuoteSource` backed by one CLI invocation per quote.
pub struct CliQuoteSource {
  config: CliQuoteSourceConfig,
}

impl CliQuoteSource {
  /// Create a new CLI-backed quote source.
  pub const fn new(config: CliQuoteSourceConfig) -> Self {
    Self { config }
  }

  fn command(&self, args: &[String]) -> Command {
    let mut command = Command::new(&self.config.program);
    command
      .args(&self.config.prefix_args)
      .args(args)
      .stdin(Stdio::null())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .kill_on_drop(true);
    if let Some(dir) = &self.config.working_dir {
      command.current_dir(dir);
    }
    command
  }
}

#[async_trait]
impl QuoteSource for CliQuoteSource {
  #[instrument(
    skip(self, request),
    fields(program = %self.config.program, chain = %request.chain_id, kind = %request.kind)
  )]
  async fn fetch_quote(&self, request: &QuoteRequest) -> Result<QuoteResults, QuoteError> {
    let args = quote_args(request);
    debug!(
      prefix = ?self.config.prefix_args,
      args = ?redacted(&args),
      timeout_s = self.config.timeout.as_secs(),
      "Spawning trading CLI"
    );

    let started = Instant::now();
    let child = self.command(&args).spawn().map_err(|source| QuoteError::Spawn {
      program: self.config.program.clone(),
      source,
    })?;

    // Dropping the future on timeout drops the child, which kills it.
    let output = match timeout(self.config.timeout, child.wait_with_output()).await {
      Ok(result) => result.map_err(|source| QuoteError::Io {
        program: self.config.program.clone(),
        source,
      })?,
      Err(_) => {
        warn!(timeout_s = self.config.timeout.as_secs(), "Trading CLI timed out, killed");
        return Err(QuoteError::Timeout {
          program: self.config.program.clone(),
          timeout: self.config.timeout,
        });
      }
    };

    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let stderr = stderr_excerpt(&output.stderr);

    if !output.status.success() {
      warn!(
        code = ?output.status.code(),
        elapsed_ms,
        stderr = %stderr,
        "Trading CLI exited unsuccessfully"
      );
      return Err(QuoteError::NonZeroExit {
        program: self.config.program.clone(),
        code: output.status.code(),
        stderr,
      });
    }

    if !stderr.is_empty() {
      debug!(stderr = %stderr, "Trading CLI wrote to stderr");
    }

    let results = parse_quote_output(&output.stdout)?;
    info!(
      elapsed_ms,
      stdout_bytes = output.stdout.len(),
      quote_id = ?results.quote_id(),
      valid_to = ?results.valid_to(),
      "Quote received"
    );
    Ok(results)
  }

  fn name(&self) -> String {
    self.config.program.clone()
  }
}

/// Trimmed stderr, keeping the tail when it is too long.
fn stderr_excerpt(stderr: &[u8]) -> String {
  let text = String::from_utf8_lossy(stderr);
  let text = text.trim();
  if text.len() <= MAX_STDERR_BYTES {
    return text.to_string();
  }
  let mut start = text.len() - MAX_STDERR_BYTES;
  while !text.is_char_boundary(start) {
    start += 1;
  }
  format!("...{}", &text[start..])
}
