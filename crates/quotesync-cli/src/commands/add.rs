use std::path::Path;

use quotesync_core::sync::PushStatus;

use crate::commands::common::{
    format_last_viewed, load_settings, normalize_text, open_orchestrator,
};
use crate::error::CliError;

pub async fn run_add(
    text_parts: &[String],
    category: &str,
    db_path: &Path,
) -> Result<(), CliError> {
    let text = normalize_text(text_parts).ok_or(CliError::EmptyText)?;

    let settings = load_settings()?;
    let orchestrator = open_orchestrator(db_path, &settings)?;
    let report = orchestrator.add_and_push(&text, category).await?;

    println!("{}", report.record.id);
    match report.push {
        PushStatus::Acknowledged(ack) => {
            if let Some(remote_id) = ack.remote_id {
                println!("Pushed to server (id {remote_id})");
            }
        }
        PushStatus::Deferred(reason) => eprintln!("Saved locally; server push failed: {reason}"),
    }
    if let Some(quote) = orchestrator.service().last_viewed().await {
        println!("{}", format_last_viewed(&quote));
    }
    Ok(())
}
