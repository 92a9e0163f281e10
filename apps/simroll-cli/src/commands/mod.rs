//! Subcommand implementations.

pub mod provision;
pub mod roster;
pub mod start;
pub mod stop;

use std::path::Path;
use std::sync::Arc;

use tracing::warn;

use simroll_batch::{
    filter_allowed, normalize_allow_list, BatchAction, BatchDispatcher, RetryCoordinator,
    RosterLoader,
};
use simroll_directory::{DirectoryService, LdapDirectory};
use simroll_labapi::LabApiClient;

use crate::error::{CliError, CliResult};
use crate::output;
use crate::settings::Settings;

/// Shared start/stop flow: roster, optional allow-list filter,
/// dispatch, retry sweeps, summary.
pub(crate) async fn run_batch(
    action: BatchAction,
    group: &str,
    lab: &str,
    allow_list: Option<&Path>,
    sweeps: u32,
    json: bool,
    settings: Settings,
) -> CliResult<()> {
    let directory = Arc::new(LdapDirectory::new(settings.directory.clone())?);
    let loader = RosterLoader::new(
        directory.clone(),
        &settings.directory.base_dn,
        &settings.directory.group_dn,
    );

    let roster = loader.load(group).await;
    let targets = match allow_list {
        Some(path) => {
            let raw = std::fs::read_to_string(path).map_err(|e| {
                CliError::Io(format!("could not read allow-list '{}': {e}", path.display()))
            })?;
            let allowed = normalize_allow_list(raw.lines(), settings.mail_domain.as_deref());
            filter_allowed(roster, &allowed)
        }
        None => roster,
    };

    if targets.is_empty() {
        unbind_quietly(directory.as_ref()).await;
        println!("No members to process for group '{group}'.");
        return Ok(());
    }

    let api = Arc::new(LabApiClient::new(settings.lab_api.clone())?);
    let dispatcher = BatchDispatcher::new(api, lab);

    let mut report = dispatcher.dispatch(action, &targets).await;

    let coordinator = RetryCoordinator::new(dispatcher);
    for _ in 0..sweeps {
        if report.failed.is_empty() && report.transport_failed.is_empty() {
            break;
        }
        coordinator.sweep(&mut report).await;
    }

    unbind_quietly(directory.as_ref()).await;
    output::print_batch_report(&report, json);

    if report.all_succeeded() {
        Ok(())
    } else {
        Err(CliError::BatchIncomplete {
            failed: report.failure_count(),
            transport_failed: report.transport_count(),
        })
    }
}

/// Close the directory connection; a failed unbind is worth a warning,
/// not a failed run.
pub(crate) async fn unbind_quietly(directory: &dyn DirectoryService) {
    if let Err(e) = directory.unbind().await {
        warn!(error = %e, "directory unbind failed");
    }
}
