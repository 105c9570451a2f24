//! Error types for the rule store

use thiserror::Error;

/// Errors raised by the rule store and its collaborators
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The section (e.g. "p", "g") has not been declared in the model
    #[error("Section '{section}' is not declared in the model")]
    UnknownSection { section: String },

    /// The section exists but the policy type does not
    #[error("Policy type '{ptype}' is not declared in section '{section}'")]
    UnknownPolicyType { section: String, ptype: String },

    /// A filter or field lookup reaches past the end of a rule
    #[error("Field index out of range: {required} field(s) required, rule has {actual}")]
    FieldIndexOutOfRange {
        field_index: usize,
        required: usize,
        actual: usize,
    },

    /// A rule's length differs from the assertion's token count
    #[error("Rule has {actual} field(s), definition '{ptype}' expects {expected}")]
    ArityMismatch {
        ptype: String,
        expected: usize,
        actual: usize,
    },

    /// A grouping definition has fewer than two `_` placeholders
    #[error("Role definition '{ptype}' must have at least 2 '_' placeholders, found {placeholders}")]
    InvalidRoleDefinition { ptype: String, placeholders: usize },

    /// The role manager holds no such edge
    #[error("Link '{user}' -> '{role}' not found")]
    LinkNotFound { user: String, role: String },

    /// A rule line could not be mapped to a policy type
    #[error("Invalid rule line: {0}")]
    InvalidRuleLine(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, PolicyError>;
