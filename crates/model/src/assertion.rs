//! Assertion - Definition and stored rules for one policy type

use rbac::RoleManager;
use shared::{PolicyError, Result, Rule};

/// Stored definition plus rule set for one (section, policy type) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assertion {
    /// Policy type, e.g. "p" or "g2"
    key: String,
    /// Raw definition, e.g. "sub, obj, act"
    definition: String,
    /// Field names derived from the definition, e.g. "p_sub"
    tokens: Vec<String>,
    pub(crate) rules: Vec<Rule>,
}

impl Assertion {
    /// Create an empty assertion from its definition
    pub fn new(key: impl Into<String>, definition: impl Into<String>) -> Self {
        let key = key.into();
        let definition = definition.into();
        let tokens = definition
            .split(',')
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .map(|field| format!("{}_{}", key, field))
            .collect();

        Self {
            key,
            definition,
            tokens,
            rules: Vec::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn definition(&self) -> &str {
        &self.definition
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Number of fields every rule must carry
    pub fn arity(&self) -> usize {
        self.tokens.len()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Index of the first rule element-wise equal to `rule`
    pub fn position<S: AsRef<str>>(&self, rule: &[S]) -> Option<usize> {
        self.rules.iter().position(|stored| rule_eq(stored, rule))
    }

    pub fn contains<S: AsRef<str>>(&self, rule: &[S]) -> bool {
        self.position(rule).is_some()
    }

    pub(crate) fn check_arity(&self, len: usize) -> Result<()> {
        if len != self.arity() {
            return Err(PolicyError::ArityMismatch {
                ptype: self.key.clone(),
                expected: self.arity(),
                actual: len,
            });
        }
        Ok(())
    }

    pub(crate) fn clear(&mut self) {
        self.rules = Vec::new();
    }

    /// Number of `_` placeholders in a grouping definition
    fn placeholder_count(&self) -> usize {
        self.definition.matches('_').count()
    }

    /// Register every stored grouping rule with `role_manager`
    ///
    /// The first field is the member, the second the role, and the fields up
    /// to the placeholder count form the domain. Edges are not deduplicated
    /// here.
    pub fn build_role_links(&self, role_manager: &mut dyn RoleManager) -> Result<()> {
        let count = self.placeholder_count();
        if count < 2 {
            return Err(PolicyError::InvalidRoleDefinition {
                ptype: self.key.clone(),
                placeholders: count,
            });
        }

        for rule in &self.rules {
            if rule.len() < count {
                return Err(PolicyError::FieldIndexOutOfRange {
                    field_index: 0,
                    required: count,
                    actual: rule.len(),
                });
            }

            let domain: Vec<&str> = rule[2..count].iter().map(String::as_str).collect();
            role_manager.add_link(&rule[0], &rule[1], &domain);
        }

        tracing::debug!(ptype = %self.key, links = self.rules.len(), "role links built");
        Ok(())
    }
}

fn rule_eq<S: AsRef<str>>(stored: &[String], rule: &[S]) -> bool {
    stored.len() == rule.len()
        && stored
            .iter()
            .zip(rule)
            .all(|(a, b)| a.as_str() == b.as_ref())
}
