//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `QuoteSource`: Swap quotes from the CoW Protocol trading CLI

pub mod quote_source;
