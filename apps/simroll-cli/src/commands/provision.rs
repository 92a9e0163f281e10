//! `simroll provision` - create directory accounts from CSV sheets.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use simroll_directory::LdapDirectory;
use simroll_provision::{CsvRowSource, ProvisionPipeline, UidAllocator};

use crate::error::CliResult;
use crate::output;
use crate::settings::Settings;

#[derive(Args)]
pub struct ProvisionArgs {
    /// CSV sheets to load, processed in order
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// First uid to issue, instead of seeding from the directory's
    /// current maximum
    #[arg(long)]
    pub start_uid: Option<u32>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: ProvisionArgs, settings: Settings) -> CliResult<()> {
    let directory = Arc::new(LdapDirectory::new(settings.directory.clone())?);
    let pipeline = ProvisionPipeline::new(directory.clone(), settings.provision.clone());

    let mut source = CsvRowSource::new(args.files);
    let report = match args.start_uid {
        Some(uid) => {
            let mut allocator = UidAllocator::starting_at(uid);
            pipeline.run_with(&mut source, &mut allocator).await?
        }
        None => pipeline.run(&mut source).await?,
    };

    super::unbind_quietly(directory.as_ref()).await;
    output::print_provision_report(&report, args.json);

    Ok(())
}
