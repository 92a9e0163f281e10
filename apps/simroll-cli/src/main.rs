//! simroll - cohort sandbox and account management CLI
//!
//! This CLI lets course staff:
//! - Start and stop per-student lab sandboxes for a cohort
//! - Retry failed sandbox operations in explicit sweeps
//! - Provision directory accounts from CSV sheets
//! - Inspect a cohort roster or look up a single user

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;
mod settings;

use error::CliResult;

/// simroll - lab sandbox and account management
#[derive(Parser)]
#[command(name = "simroll")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = "simroll.toml")]
    config: std::path::PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start sandboxes for a cohort
    Start(commands::start::StartArgs),

    /// Stop sandboxes for a cohort
    Stop(commands::stop::StopArgs),

    /// Provision directory accounts from CSV sheets
    Provision(commands::provision::ProvisionArgs),

    /// Show a cohort roster or look up a single user
    Roster(commands::roster::RosterArgs),
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so --json output on stdout stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let settings = settings::Settings::load(&cli.config)?;

    match cli.command {
        Commands::Start(args) => commands::start::execute(args, settings).await,
        Commands::Stop(args) => commands::stop::execute(args, settings).await,
        Commands::Provision(args) => commands::provision::execute(args, settings).await,
        Commands::Roster(args) => commands::roster::execute(args, settings).await,
    }
}
