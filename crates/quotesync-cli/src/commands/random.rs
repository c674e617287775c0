use std::path::Path;

use crate::commands::common::{format_quote, open_service, resolve_filter};
use crate::error::CliError;

pub async fn run_random(category: Option<&str>, db_path: &Path) -> Result<(), CliError> {
    let service = open_service(db_path)?;
    let filter = resolve_filter(category, &service).await?;

    match service.random_quote(&filter).await {
        Some(quote) => println!("{}", format_quote(&quote)),
        None => println!("No quotes available in {filter}."),
    }
    Ok(())
}
