use std::path::Path;

use quotesync_core::CategoryFilter;

use crate::commands::common::open_service;
use crate::error::CliError;

pub async fn run_categories(db_path: &Path) -> Result<(), CliError> {
    let service = open_service(db_path)?;
    let current = service.current_filter().await?;

    for category in service.categories().await {
        let selected =
            matches!(current, CategoryFilter::Category(_)) && current.matches_category(&category);
        let marker = if selected { "*" } else { " " };
        println!("{marker} {category}");
    }
    Ok(())
}
