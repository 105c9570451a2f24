//! # Shared
//!
//! Common types used across the rule store crates: errors, rule tuples and
//! seed configuration.

pub mod error;
pub mod rule;
pub mod config;

// Re-exports
pub use error::*;
pub use rule::*;
pub use config::*;
