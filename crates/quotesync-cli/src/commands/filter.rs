use std::path::Path;

use quotesync_core::CategoryFilter;

use crate::commands::common::open_service;
use crate::error::CliError;

pub async fn run_filter(category: &str, db_path: &Path) -> Result<(), CliError> {
    let service = open_service(db_path)?;
    let filter = CategoryFilter::parse(category);
    service.set_filter(&filter).await?;

    println!("Filter set to {filter}");
    Ok(())
}
