//! `simroll start` - start sandboxes for a cohort.

use std::path::PathBuf;

use clap::Args;

use simroll_batch::BatchAction;

use crate::error::CliResult;
use crate::settings::Settings;

#[derive(Args)]
pub struct StartArgs {
    /// Cohort group name in the directory
    pub group: String,

    /// Lab name sent to the simulation service
    #[arg(long)]
    pub lab: String,

    /// File of registered addresses, one per line; only matching
    /// members are started
    #[arg(long)]
    pub allow_list: Option<PathBuf>,

    /// Retry sweeps to run over failed entries
    #[arg(long, default_value_t = 1)]
    pub sweeps: u32,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: StartArgs, settings: Settings) -> CliResult<()> {
    super::run_batch(
        BatchAction::Create,
        &args.group,
        &args.lab,
        args.allow_list.as_deref(),
        args.sweeps,
        args.json,
        settings,
    )
    .await
}
