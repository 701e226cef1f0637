//! Domain layer - Quote parameters and quote results.
//!
//! Pure value types with no I/O. Everything here is validated at
//! construction so adapters can render it without re-checking.

pub mod quote;
pub mod trade;

// Re-export core types for convenience
pub use quote::{PartnerFee, QuoteRequest, QuoteResults, SignerKey};
pub use trade::{ChainId, CowEnv, OrderKind, TokenAmount};
