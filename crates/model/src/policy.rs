//! Policy - Rule store keyed by (section, policy type)

use crate::{Assertion, FieldFilter};
use rbac::RoleManager;
use shared::{
    section_of, to_rule, PolicyError, Result, Rule, StoreConfig, GROUPING_SECTION,
    POLICY_SECTION,
};
use std::collections::{BTreeMap, HashSet};

/// Composite key of an assertion
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssertionKey {
    pub section: String,
    pub ptype: String,
}

impl AssertionKey {
    pub fn new(section: impl Into<String>, ptype: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            ptype: ptype.into(),
        }
    }
}

/// In-memory store of policy and grouping rules
///
/// Every query and mutation names a declared (section, policy type) pair;
/// an undeclared section and an undeclared type within a known section are
/// reported as different errors. Rules keep insertion order.
///
/// `Policy` holds no locks. Share it across threads behind a `RwLock`.
#[derive(Debug, Clone, Default)]
pub struct Policy {
    assertions: BTreeMap<AssertionKey, Assertion>,
}

fn lookup_error(section_known: bool, sec: &str, ptype: &str) -> PolicyError {
    if section_known {
        PolicyError::UnknownPolicyType {
            section: sec.to_string(),
            ptype: ptype.to_string(),
        }
    } else {
        PolicyError::UnknownSection {
            section: sec.to_string(),
        }
    }
}

impl Policy {
    /// Create an empty Policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a policy from a seed configuration
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        config.validate()?;

        let mut policy = Self::new();
        for (sec, types) in &config.definitions {
            for (ptype, definition) in types {
                if !policy.add_def(sec, ptype, definition) {
                    return Err(PolicyError::Config(format!(
                        "Policy type '{}' has an empty definition",
                        ptype
                    )));
                }
            }
        }

        for line in &config.rules {
            policy.load_rule_line(line)?;
        }

        tracing::debug!(
            types = policy.assertions.len(),
            rules = config.rules.len(),
            "policy loaded from config"
        );
        Ok(policy)
    }

    // ============== Declarations ==============

    /// Declare a policy type; an empty definition declares nothing
    ///
    /// Redeclaring a type replaces its definition and drops its rules.
    pub fn add_def(&mut self, sec: &str, key: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            return false;
        }

        self.assertions
            .insert(AssertionKey::new(sec, key), Assertion::new(key, value));
        true
    }

    pub fn has_section(&self, sec: &str) -> bool {
        self.assertions.keys().any(|k| k.section == sec)
    }

    /// Declared policy types of a section, in key order
    pub fn policy_types(&self, sec: &str) -> Vec<&str> {
        self.assertions
            .keys()
            .filter(|key| key.section == sec)
            .map(|key| key.ptype.as_str())
            .collect()
    }

    pub fn assertion(&self, sec: &str, ptype: &str) -> Result<&Assertion> {
        self.assertions
            .get(&AssertionKey::new(sec, ptype))
            .ok_or_else(|| lookup_error(self.has_section(sec), sec, ptype))
    }

    fn assertion_mut(&mut self, sec: &str, ptype: &str) -> Result<&mut Assertion> {
        let section_known = self.has_section(sec);
        self.assertions
            .get_mut(&AssertionKey::new(sec, ptype))
            .ok_or_else(|| lookup_error(section_known, sec, ptype))
    }

    fn section_entries<'a>(
        &'a self,
        sec: &'a str,
    ) -> impl Iterator<Item = (&'a AssertionKey, &'a Assertion)> + 'a {
        self.assertions.iter().filter(move |(key, _)| key.section == sec)
    }

    // ============== Role Links ==============

    /// Feed every grouping rule to `role_manager`
    ///
    /// Call after the "g" rules are loaded and before any decision that
    /// depends on role membership.
    pub fn build_role_links(&self, role_manager: &mut dyn RoleManager) -> Result<()> {
        if !self.has_section(GROUPING_SECTION) {
            return Err(PolicyError::UnknownSection {
                section: GROUPING_SECTION.to_string(),
            });
        }

        for (_, ast) in self.section_entries(GROUPING_SECTION) {
            ast.build_role_links(role_manager)?;
        }
        Ok(())
    }

    // ============== Reporting ==============

    /// Lines emitted by `print_policy`
    pub fn report_lines(&self) -> Vec<String> {
        let mut lines = vec!["Policy:".to_string()];

        for sec in [POLICY_SECTION, GROUPING_SECTION] {
            for (key, ast) in self.section_entries(sec) {
                lines.push(format!(
                    "{}: {}: {:?}",
                    key.ptype,
                    ast.definition(),
                    ast.rules()
                ));
            }
        }
        lines
    }

    /// Log every rule, "p" types first, then "g"
    pub fn print_policy(&self) {
        for line in self.report_lines() {
            tracing::info!("{}", line);
        }
    }

    /// Empty every "p" and "g" rule set, keeping the declarations
    pub fn clear_policy(&mut self) {
        for (key, ast) in self.assertions.iter_mut() {
            if key.section == POLICY_SECTION || key.section == GROUPING_SECTION {
                ast.clear();
            }
        }
    }

    // ============== Queries ==============

    /// All rules of a policy type, in insertion order
    pub fn get_policy(&self, sec: &str, ptype: &str) -> Result<&[Rule]> {
        Ok(self.assertion(sec, ptype)?.rules())
    }

    /// Rules matching `field_values` from `field_index` on ("" is a wildcard)
    pub fn get_filtered_policy(
        &self,
        sec: &str,
        ptype: &str,
        field_index: usize,
        field_values: &[&str],
    ) -> Result<Vec<Rule>> {
        let filter = FieldFilter::new(field_index, field_values);
        let mut res = Vec::new();

        for rule in self.assertion(sec, ptype)?.rules() {
            if filter.matches(rule)? {
                res.push(rule.clone());
            }
        }
        Ok(res)
    }

    pub fn has_policy<S: AsRef<str>>(&self, sec: &str, ptype: &str, rule: &[S]) -> Result<bool> {
        Ok(self.assertion(sec, ptype)?.contains(rule))
    }

    /// Whether any of `rules` is stored
    pub fn has_policies(&self, sec: &str, ptype: &str, rules: &[Rule]) -> Result<bool> {
        let ast = self.assertion(sec, ptype)?;
        Ok(rules.iter().any(|rule| ast.contains(rule)))
    }

    /// Distinct values at `field_index`, in first-seen order
    pub fn get_values_for_field_in_policy(
        &self,
        sec: &str,
        ptype: &str,
        field_index: usize,
    ) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        let mut values = Vec::new();

        for rule in self.assertion(sec, ptype)?.rules() {
            let value = rule
                .get(field_index)
                .ok_or(PolicyError::FieldIndexOutOfRange {
                    field_index,
                    required: field_index.saturating_add(1),
                    actual: rule.len(),
                })?;

            if seen.insert(value.as_str()) {
                values.push(value.clone());
            }
        }
        Ok(values)
    }

    // ============== Mutations ==============

    /// Append `rule` unless an equal rule is already stored
    pub fn add_policy(&mut self, sec: &str, ptype: &str, rule: Rule) -> Result<bool> {
        let ast = self.assertion_mut(sec, ptype)?;
        ast.check_arity(rule.len())?;

        if ast.contains(&rule) {
            return Ok(false);
        }

        tracing::debug!(section = sec, ptype, rule = ?rule, "rule added");
        ast.rules.push(rule);
        Ok(true)
    }

    /// Append all of `rules`, or none if any is already stored or repeated
    pub fn add_policies(&mut self, sec: &str, ptype: &str, rules: Vec<Rule>) -> Result<bool> {
        let ast = self.assertion_mut(sec, ptype)?;
        for rule in &rules {
            ast.check_arity(rule.len())?;
        }

        let conflict = {
            let mut batch = HashSet::new();
            rules
                .iter()
                .any(|rule| ast.contains(rule) || !batch.insert(rule))
        };
        if conflict {
            return Ok(false);
        }

        tracing::debug!(section = sec, ptype, count = rules.len(), "rules added");
        ast.rules.extend(rules);
        Ok(true)
    }

    /// Remove the first rule equal to `rule`
    pub fn remove_policy<S: AsRef<str>>(&mut self, sec: &str, ptype: &str, rule: &[S]) -> Result<bool> {
        let ast = self.assertion_mut(sec, ptype)?;

        match ast.position(rule) {
            Some(index) => {
                let removed = ast.rules.remove(index);
                tracing::debug!(section = sec, ptype, rule = ?removed, "rule removed");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove all of `rules`, or none if any is missing
    pub fn remove_policies(&mut self, sec: &str, ptype: &str, rules: &[Rule]) -> Result<bool> {
        let ast = self.assertion_mut(sec, ptype)?;

        let mut doomed = HashSet::new();
        for rule in rules {
            match ast.position(rule) {
                Some(index) if doomed.insert(index) => {}
                _ => return Ok(false),
            }
        }

        let current = std::mem::take(&mut ast.rules);
        ast.rules = current
            .into_iter()
            .enumerate()
            .filter_map(|(index, rule)| (!doomed.contains(&index)).then_some(rule))
            .collect();

        tracing::debug!(section = sec, ptype, count = rules.len(), "rules removed");
        Ok(true)
    }

    /// Remove every rule matching the filter, keeping survivors in order
    ///
    /// The filter is checked against every rule before anything is removed,
    /// so an out-of-range filter leaves the rules untouched.
    pub fn remove_filtered_policy(
        &mut self,
        sec: &str,
        ptype: &str,
        field_index: usize,
        field_values: &[&str],
    ) -> Result<bool> {
        let ast = self.assertion_mut(sec, ptype)?;
        let filter = FieldFilter::new(field_index, field_values);

        let matched = ast
            .rules
            .iter()
            .map(|rule| filter.matches(rule))
            .collect::<Result<Vec<bool>>>()?;

        if !matched.contains(&true) {
            return Ok(false);
        }

        let current = std::mem::take(&mut ast.rules);
        ast.rules = current
            .into_iter()
            .zip(matched)
            .filter_map(|(rule, hit)| (!hit).then_some(rule))
            .collect();

        tracing::debug!(
            section = sec,
            ptype,
            field_index,
            field_values = ?field_values,
            "filtered rules removed"
        );
        Ok(true)
    }

    /// Replace `old` with `new` at the same position
    ///
    /// Returns false if `old` is not stored or `new` would duplicate another
    /// rule.
    pub fn update_policy<S: AsRef<str>>(
        &mut self,
        sec: &str,
        ptype: &str,
        old: &[S],
        new: Rule,
    ) -> Result<bool> {
        let ast = self.assertion_mut(sec, ptype)?;
        ast.check_arity(new.len())?;

        let Some(index) = ast.position(old) else {
            return Ok(false);
        };
        if ast.position(&new).is_some_and(|existing| existing != index) {
            return Ok(false);
        }

        tracing::debug!(section = sec, ptype, rule = ?new, "rule updated");
        ast.rules[index] = new;
        Ok(true)
    }

    /// Load one rule line whose first element is the policy type
    pub fn load_rule_line<S: AsRef<str>>(&mut self, line: &[S]) -> Result<bool> {
        let (ptype, fields) = line
            .split_first()
            .ok_or_else(|| PolicyError::InvalidRuleLine("empty rule line".to_string()))?;
        let ptype = ptype.as_ref();

        let sec = section_of(ptype).ok_or_else(|| {
            PolicyError::InvalidRuleLine(format!("'{}' is not a policy type", ptype))
        })?;

        self.add_policy(sec, ptype, to_rule(fields))
    }
}
