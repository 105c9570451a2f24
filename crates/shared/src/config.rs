//! Configuration types for seeding a rule store

use crate::{section_of, PolicyError, Rule};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Seed file format (`policy.json` / `policy.yaml`)
///
/// ```json
/// {
///   "definitions": {
///     "p": { "p": "sub, obj, act" },
///     "g": { "g": "_, _" }
///   },
///   "rules": [
///     ["p", "alice", "data1", "read"],
///     ["g", "alice", "admin"]
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Section -> policy type -> definition
    #[serde(default)]
    pub definitions: BTreeMap<String, BTreeMap<String, String>>,

    /// Rule lines, the first element naming the policy type
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl StoreConfig {
    /// Load configuration from a JSON or YAML file, chosen by extension
    ///
    /// Rule lines are checked by `validate` when the config is applied.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content)?,
            Some("json") => Self::from_json_str(&content)?,
            other => {
                return Err(PolicyError::Config(format!(
                    "Unsupported config extension {:?} for {}",
                    other.unwrap_or(""),
                    path.display()
                )))
            }
        };

        Ok(config)
    }

    pub fn from_json_str(content: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> crate::Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Check that every rule line names a declared policy type
    pub fn validate(&self) -> crate::Result<()> {
        for (section, types) in &self.definitions {
            for ptype in types.keys() {
                if section_of(ptype) != Some(section.as_str()) {
                    return Err(PolicyError::Config(format!(
                        "Policy type '{}' cannot be declared under section '{}'",
                        ptype, section
                    )));
                }
            }
        }

        for line in &self.rules {
            let ptype = line
                .first()
                .ok_or_else(|| PolicyError::InvalidRuleLine("empty rule line".to_string()))?;

            let declared = section_of(ptype)
                .and_then(|section| self.definitions.get(section))
                .map(|types| types.contains_key(ptype))
                .unwrap_or(false);

            if !declared {
                return Err(PolicyError::Config(format!(
                    "Rule line {:?} uses undeclared policy type '{}'",
                    line, ptype
                )));
            }
        }

        Ok(())
    }

    /// Declared policy types, as (section, ptype) pairs
    pub fn policy_types(&self) -> Vec<(&str, &str)> {
        self.definitions
            .iter()
            .flat_map(|(section, types)| {
                types.keys().map(move |ptype| (section.as_str(), ptype.as_str()))
            })
            .collect()
    }
}
