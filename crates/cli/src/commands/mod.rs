//! CLI Commands

pub mod query;
pub mod roles;
pub mod show;

pub use query::{FilterCommand, ValuesCommand};
pub use roles::RolesCommand;
pub use show::ShowCommand;

use anyhow::Context;
use clap::Args;
use model::Policy;
use shared::{section_of, StoreConfig};
use std::path::PathBuf;

/// Seed file shared by every subcommand
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Policy seed file (.json, .yaml or .yml)
    #[arg(short, long, default_value = "policy.json")]
    pub config: PathBuf,
}

impl ConfigArgs {
    /// Load the seed file into a fresh policy
    pub fn load(&self) -> anyhow::Result<Policy> {
        let config = StoreConfig::from_file(&self.config)
            .with_context(|| format!("failed to load {}", self.config.display()))?;
        let policy = Policy::from_config(&config)?;
        tracing::debug!(path = %self.config.display(), "policy seed loaded");
        Ok(policy)
    }
}

/// Section of a policy type given on the command line
pub(crate) fn section_for(ptype: &str) -> anyhow::Result<&str> {
    section_of(ptype).with_context(|| format!("'{}' is not a policy type", ptype))
}

pub(crate) fn format_rule(rule: &[String]) -> String {
    rule.join(", ")
}

#[cfg(test)]
pub(crate) mod test_support {
    use model::Policy;
    use shared::to_rule;

    pub fn sample_policy() -> Policy {
        let mut policy = Policy::new();
        policy.add_def("p", "p", "sub, obj, act");
        policy.add_def("g", "g", "_, _");
        policy.add_def("g", "g2", "_, _, _");

        for rule in [
            ["alice", "data1", "read"],
            ["bob", "data2", "write"],
            ["alice", "data2", "read"],
        ] {
            policy.add_policy("p", "p", to_rule(&rule)).unwrap();
        }
        policy.add_policy("g", "g", to_rule(&["alice", "admin"])).unwrap();
        policy.add_policy("g", "g", to_rule(&["alice", "auditor"])).unwrap();
        policy
            .add_policy("g", "g2", to_rule(&["bob", "owner", "tenant1"]))
            .unwrap();
        policy
    }
}
