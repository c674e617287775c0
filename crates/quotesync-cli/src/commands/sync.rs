use std::path::Path;

use quotesync_core::remote::RemoteSource;
use quotesync_core::state::SyncTrigger;
use quotesync_core::sync::{SyncOrchestrator, SyncOutcome};

use crate::cli::ConflictChoice;
use crate::commands::common::{format_conflict_lines, load_settings, open_orchestrator};
use crate::error::CliError;

pub async fn run_sync(resolve: Option<ConflictChoice>, db_path: &Path) -> Result<(), CliError> {
    let settings = load_settings()?;
    let orchestrator = open_orchestrator(db_path, &settings)?;

    let outcome = orchestrator.run_cycle(SyncTrigger::Manual).await?;
    report_outcome(&outcome);

    if !outcome.conflicts().is_empty() {
        let message = resolve_conflicts(&orchestrator, resolve).await?;
        println!("{message}");
    }
    Ok(())
}

pub fn report_outcome(outcome: &SyncOutcome) {
    println!("{}", outcome.notice());
    for line in format_conflict_lines(outcome.conflicts()) {
        println!("  {line}");
    }
}

/// Apply the chosen side to every pending conflict. Server wins by default.
pub async fn resolve_conflicts<R: RemoteSource>(
    orchestrator: &SyncOrchestrator<R>,
    choice: Option<ConflictChoice>,
) -> Result<String, CliError> {
    let service = orchestrator.service();
    match choice.unwrap_or(ConflictChoice::Remote) {
        ConflictChoice::Remote => {
            let kept = service.keep_remote_for_all().await;
            Ok(format!("Kept server version for {kept} quotes"))
        }
        ConflictChoice::Local => {
            let reverted = service.keep_local_for_all().await?;
            Ok(format!("Restored local version for {reverted} quotes"))
        }
    }
}
