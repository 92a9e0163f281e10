//! `simroll roster` - inspect a cohort roster.

use std::sync::Arc;

use clap::Args;

use simroll_batch::RosterLoader;
use simroll_directory::LdapDirectory;

use crate::error::{CliError, CliResult};
use crate::output;
use crate::settings::Settings;

#[derive(Args)]
pub struct RosterArgs {
    /// Cohort group name in the directory
    #[arg(required_unless_present = "user")]
    pub group: Option<String>,

    /// Look up a single user by identifier instead
    #[arg(long, conflicts_with = "group")]
    pub user: Option<String>,

    /// Print the roster as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: RosterArgs, settings: Settings) -> CliResult<()> {
    let directory = Arc::new(LdapDirectory::new(settings.directory.clone())?);
    let loader = RosterLoader::new(
        directory.clone(),
        &settings.directory.base_dn,
        &settings.directory.group_dn,
    );

    let result = match (&args.group, &args.user) {
        (_, Some(user)) => match loader.find_user(user).await {
            Some(entry) => Ok(vec![entry]),
            None => Err(CliError::Validation(format!("no user with uid '{user}'"))),
        },
        (Some(group), None) => Ok(loader.load(group).await),
        (None, None) => Err(CliError::Validation(
            "a group name or --user is required".to_string(),
        )),
    };

    super::unbind_quietly(directory.as_ref()).await;

    let roster = result?;
    output::print_roster(&roster, args.json);
    Ok(())
}
