//! CoW Protocol Trading CLI Adapter
//!
//! Implements `QuoteSource` by running the external trading CLI as a
//! subprocess. The CLI is a black box: this adapter only builds its
//! command line and reads the JSON it prints.
//!
//! Sub-modules:
//! - `args`: `--flag=value` argument vector and log redaction
//! - `output`: stdout to `QuoteResults` parsing
//! - `process`: subprocess spawning with a deadline

pub mod args;
pub mod output;
pub mod process;

pub use process::{CliQuoteSource, CliQuoteSourceConfig};
