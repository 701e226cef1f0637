//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain types with port interfaces.
//!
//! Use cases:
//! - `QuoteReporter`: Fetch one quote and print its key fields

pub mod quote_report;
