//! policy filter / values commands

use super::{format_rule, section_for, ConfigArgs};
use clap::Args;
use console::style;
use model::Policy;

#[derive(Debug, Args)]
pub struct FilterCommand {
    #[command(flatten)]
    pub source: ConfigArgs,

    /// Policy type to query
    #[arg(short, long, default_value = "p")]
    pub ptype: String,

    /// Index of the first filtered field
    #[arg(short, long, default_value_t = 0)]
    pub index: usize,

    /// Field values; pass "" to match any value
    pub values: Vec<String>,
}

impl FilterCommand {
    pub fn run(&self) -> anyhow::Result<()> {
        let policy = self.source.load()?;
        let lines = self.execute(&policy)?;

        println!(
            "{} {} rule(s) in '{}'",
            style("✓").green(),
            lines.len(),
            self.ptype
        );
        for line in lines {
            println!("  {}", line);
        }
        Ok(())
    }

    pub fn execute(&self, policy: &Policy) -> anyhow::Result<Vec<String>> {
        let sec = section_for(&self.ptype)?;
        let values: Vec<&str> = self.values.iter().map(String::as_str).collect();

        let rules = policy.get_filtered_policy(sec, &self.ptype, self.index, &values)?;
        Ok(rules.iter().map(|rule| format_rule(rule)).collect())
    }
}

#[derive(Debug, Args)]
pub struct ValuesCommand {
    #[command(flatten)]
    pub source: ConfigArgs,

    /// Policy type to query
    #[arg(short, long, default_value = "p")]
    pub ptype: String,

    /// Field index to collect
    #[arg(short, long, default_value_t = 0)]
    pub index: usize,
}

impl ValuesCommand {
    pub fn run(&self) -> anyhow::Result<()> {
        let policy = self.source.load()?;

        println!("{}", style(format!("Field {} of '{}':", self.index, self.ptype)).bold());
        for value in self.execute(&policy)? {
            println!("  {}", value);
        }
        Ok(())
    }

    pub fn execute(&self, policy: &Policy) -> anyhow::Result<Vec<String>> {
        let sec = section_for(&self.ptype)?;
        Ok(policy.get_values_for_field_in_policy(sec, &self.ptype, self.index)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::sample_policy;
    use std::path::PathBuf;

    fn source() -> ConfigArgs {
        ConfigArgs {
            config: PathBuf::from("unused.json"),
        }
    }

    #[test]
    fn test_filter_with_wildcard() {
        let cmd = FilterCommand {
            source: source(),
            ptype: "p".to_string(),
            index: 0,
            values: vec!["alice".to_string(), String::new(), "read".to_string()],
        };

        let lines = cmd.execute(&sample_policy()).unwrap();
        assert_eq!(lines, vec!["alice, data1, read", "alice, data2, read"]);
    }

    #[test]
    fn test_filter_unknown_type() {
        let cmd = FilterCommand {
            source: source(),
            ptype: "p3".to_string(),
            index: 0,
            values: Vec::new(),
        };

        let err = cmd.execute(&sample_policy()).unwrap_err();
        assert!(err.to_string().contains("p3"));
    }

    #[test]
    fn test_values() {
        let cmd = ValuesCommand {
            source: source(),
            ptype: "p".to_string(),
            index: 1,
        };

        assert_eq!(cmd.execute(&sample_policy()).unwrap(), vec!["data1", "data2"]);
    }
}
