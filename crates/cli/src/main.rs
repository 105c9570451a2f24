//! policy - Inspect a seeded rule store
//!
//! Usage:
//!   policy show   --config policy.json                       - Log every rule
//!   policy filter --config policy.json -p p -i 1 data1 ""    - Filter rules by field
//!   policy values --config policy.json -p p -i 0             - Distinct values of a field
//!   policy roles  --config policy.json -u alice [-d tenant1] - Direct roles of a user

use clap::{Parser, Subcommand};
use cli::commands::{FilterCommand, RolesCommand, ShowCommand, ValuesCommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "policy")]
#[command(about = "Inspect policy and grouping rules")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log every stored rule
    Show(ShowCommand),
    /// List rules matching a field filter
    Filter(FilterCommand),
    /// List the distinct values of one field
    Values(ValuesCommand),
    /// List the direct roles of a user
    Roles(RolesCommand),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging; `show` output goes through the subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Show(cmd) => cmd.run(),
        Commands::Filter(cmd) => cmd.run(),
        Commands::Values(cmd) => cmd.run(),
        Commands::Roles(cmd) => cmd.run(),
    }
}
