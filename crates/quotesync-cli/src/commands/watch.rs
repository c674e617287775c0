use std::path::Path;
use std::time::Duration;

use chrono::Local;
use quotesync_core::sync::SyncOutcome;

use crate::commands::common::{load_settings, open_orchestrator};
use crate::commands::sync::report_outcome;
use crate::error::CliError;

pub async fn run_watch(interval_secs: Option<u64>, db_path: &Path) -> Result<(), CliError> {
    let settings = load_settings()?;
    let interval = match interval_secs {
        Some(0) => return Err(CliError::Config("interval must be at least 1 second".into())),
        Some(secs) => Duration::from_secs(secs),
        None => settings.interval(),
    };
    let orchestrator = open_orchestrator(db_path, &settings)?;

    println!(
        "Syncing with {} every {}s (Ctrl-C to stop)",
        settings.remote_endpoint,
        interval.as_secs()
    );

    let shutdown = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {error}");
            std::future::pending::<()>().await;
        }
    };

    orchestrator
        .run_periodic(interval, shutdown, |outcome| {
            if should_report(outcome) {
                print!("[{}] ", Local::now().format("%H:%M:%S"));
                report_outcome(outcome);
            }
        })
        .await;

    println!("Stopped");
    Ok(())
}

/// Quiet cycles are not worth a line every tick.
pub const fn should_report(outcome: &SyncOutcome) -> bool {
    matches!(outcome, SyncOutcome::Applied(_))
}
