//! # Model
//!
//! In-memory store for the policy ("p") and grouping ("g") rules an
//! authorization evaluator consults.
//!
//! ## Components
//!
//! - `Assertion` - Definition, field tokens and stored rules of one policy type
//! - `FieldFilter` - Positional match predicate with "" as wildcard
//! - `Policy` - Container keyed by (section, policy type)

pub mod assertion;
pub mod filter;
pub mod policy;

pub use assertion::Assertion;
pub use filter::FieldFilter;
pub use policy::{AssertionKey, Policy};
