//! # CLI
//!
//! Command-line inspection of a seeded rule store.

pub mod commands;
