//! policy show command

use super::ConfigArgs;
use clap::Args;
use model::Policy;

#[derive(Debug, Args)]
pub struct ShowCommand {
    #[command(flatten)]
    pub source: ConfigArgs,
}

impl ShowCommand {
    pub fn run(&self) -> anyhow::Result<()> {
        let policy = self.source.load()?;
        self.execute(&policy);
        Ok(())
    }

    /// Log the whole store through `print_policy`
    pub fn execute(&self, policy: &Policy) {
        policy.print_policy();
    }
}
