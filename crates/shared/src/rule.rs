//! Rule tuples and section identifiers

/// One ordered record of string fields
pub type Rule = Vec<String>;

/// Section holding policy rules
pub const POLICY_SECTION: &str = "p";

/// Section holding role-grouping rules
pub const GROUPING_SECTION: &str = "g";

/// Build a rule from borrowed fields
pub fn to_rule<S: AsRef<str>>(fields: &[S]) -> Rule {
    fields.iter().map(|f| f.as_ref().to_string()).collect()
}

/// Section a policy type belongs to: its leading alphabetic run.
///
/// `p2` lives in `p`, `g` in `g`. Returns `None` when the type does not
/// start with a letter.
pub fn section_of(ptype: &str) -> Option<&str> {
    let end = ptype
        .char_indices()
        .find(|(_, c)| !c.is_ascii_alphabetic())
        .map(|(i, _)| i)
        .unwrap_or(ptype.len());

    if end == 0 {
        None
    } else {
        Some(&ptype[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_of() {
        assert_eq!(section_of("p"), Some("p"));
        assert_eq!(section_of("p2"), Some("p"));
        assert_eq!(section_of("g3"), Some("g"));
        assert_eq!(section_of("2p"), None);
        assert_eq!(section_of(""), None);
    }

    #[test]
    fn test_to_rule() {
        let rule = to_rule(&["alice", "data1", "read"]);
        assert_eq!(rule, vec!["alice".to_string(), "data1".to_string(), "read".to_string()]);
    }
}
