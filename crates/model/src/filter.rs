//! Positional field filters

use shared::{PolicyError, Result};

/// Matches rules whose fields, starting at `field_index`, equal
/// `field_values` position by position. An empty value matches anything.
#[derive(Debug, Clone, Copy)]
pub struct FieldFilter<'a> {
    field_index: usize,
    field_values: &'a [&'a str],
}

impl<'a> FieldFilter<'a> {
    pub fn new(field_index: usize, field_values: &'a [&'a str]) -> Self {
        Self {
            field_index,
            field_values,
        }
    }

    /// Number of fields a rule needs for this filter to address it
    pub fn required_len(&self) -> usize {
        self.field_index.saturating_add(self.field_values.len())
    }

    /// Test a rule; a rule too short to address is an error, not a miss
    pub fn matches(&self, rule: &[String]) -> Result<bool> {
        let required = self.required_len();
        if rule.len() < required {
            return Err(PolicyError::FieldIndexOutOfRange {
                field_index: self.field_index,
                required,
                actual: rule.len(),
            });
        }

        Ok(self
            .field_values
            .iter()
            .zip(&rule[self.field_index..required])
            .all(|(value, field)| value.is_empty() || *value == field.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::to_rule;

    #[test]
    fn test_exact_match() {
        let rule = to_rule(&["alice", "data1", "read"]);

        assert!(FieldFilter::new(0, &["alice"]).matches(&rule).unwrap());
        assert!(FieldFilter::new(1, &["data1", "read"]).matches(&rule).unwrap());
        assert!(!FieldFilter::new(1, &["data2"]).matches(&rule).unwrap());
    }

    #[test]
    fn test_empty_value_is_wildcard() {
        let rule = to_rule(&["alice", "data1", "read"]);

        assert!(FieldFilter::new(0, &["alice", "", "read"]).matches(&rule).unwrap());
        assert!(!FieldFilter::new(0, &["alice", "", "write"]).matches(&rule).unwrap());
    }

    #[test]
    fn test_no_values_matches_everything() {
        let rule = to_rule(&["alice", "data1", "read"]);
        assert!(FieldFilter::new(3, &[]).matches(&rule).unwrap());
    }

    #[test]
    fn test_short_rule_is_an_error() {
        let rule = to_rule(&["alice", "data1"]);
        let err = FieldFilter::new(1, &["data1", "read"]).matches(&rule).unwrap_err();

        assert!(matches!(
            err,
            PolicyError::FieldIndexOutOfRange {
                field_index: 1,
                required: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_huge_index_is_an_error() {
        let rule = to_rule(&["alice", "data1", "read"]);

        let err = FieldFilter::new(usize::MAX, &["x"]).matches(&rule).unwrap_err();
        assert!(matches!(
            err,
            PolicyError::FieldIndexOutOfRange {
                required: usize::MAX,
                actual: 3,
                ..
            }
        ));
        assert!(FieldFilter::new(usize::MAX, &[]).matches(&rule).is_err());
    }

    #[test]
    fn test_wildcard_does_not_excuse_short_rule() {
        let rule = to_rule(&["alice"]);
        assert!(FieldFilter::new(0, &["", ""]).matches(&rule).is_err());
    }
}
