use std::path::Path;

use crate::commands::common::{format_last_viewed, open_service};
use crate::error::CliError;

pub async fn run_import(input_path: &Path, db_path: &Path) -> Result<(), CliError> {
    let raw = std::fs::read_to_string(input_path)?;
    let service = open_service(db_path)?;
    let report = service.import_json(&raw).await?;

    println!(
        "Imported {} quotes ({} invalid, {} duplicates skipped)",
        report.added.len(),
        report.invalid,
        report.duplicates
    );
    if let Some(quote) = service.last_viewed().await {
        println!("{}", format_last_viewed(&quote));
    }
    Ok(())
}
