//! policy roles command

use super::ConfigArgs;
use clap::Args;
use console::style;
use model::Policy;
use rbac::{DefaultRoleManager, RoleManager, DEFAULT_MAX_HIERARCHY_LEVEL};

#[derive(Debug, Args)]
pub struct RolesCommand {
    #[command(flatten)]
    pub source: ConfigArgs,

    /// User whose roles are listed
    #[arg(short, long)]
    pub user: String,

    /// Domain the roles are scoped to
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Maximum role hops followed when checking inheritance
    #[arg(long, default_value_t = DEFAULT_MAX_HIERARCHY_LEVEL)]
    pub max_level: usize,
}

impl RolesCommand {
    pub fn run(&self) -> anyhow::Result<()> {
        let policy = self.source.load()?;
        let roles = self.execute(&policy)?;

        println!("{}", style(format!("Roles of '{}':", self.user)).bold());
        if roles.is_empty() {
            println!("  (none)");
        }
        for role in roles {
            println!("  {}", role);
        }
        Ok(())
    }

    /// Direct roles of the user, after building links from the "g" rules
    pub fn execute(&self, policy: &Policy) -> anyhow::Result<Vec<String>> {
        let mut manager = DefaultRoleManager::with_max_hierarchy_level(self.max_level);
        policy.build_role_links(&mut manager)?;

        let domain: Vec<&str> = self.domain.iter().map(String::as_str).collect();
        Ok(manager.get_roles(&self.user, &domain))
    }
}
