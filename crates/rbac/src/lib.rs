//! # RBAC
//!
//! Role hierarchy for the rule store.
//!
//! ## Components
//!
//! - `RoleManager` - Capability to register and query role links
//! - `DefaultRoleManager` - In-memory, domain-aware implementation

pub mod role_manager;

pub use role_manager::{DefaultRoleManager, RoleManager, DEFAULT_MAX_HIERARCHY_LEVEL};
