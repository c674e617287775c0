use std::path::Path;

use crate::commands::common::{
    format_quote_lines, open_service, quote_to_list_item, resolve_filter, QuoteListItem,
};
use crate::error::CliError;

pub async fn run_list(
    category: Option<&str>,
    as_json: bool,
    db_path: &Path,
) -> Result<(), CliError> {
    let service = open_service(db_path)?;
    let filter = resolve_filter(category, &service).await?;
    let quotes = service.filtered_quotes(&filter).await;

    if as_json {
        let json_items = quotes
            .iter()
            .map(quote_to_list_item)
            .collect::<Vec<QuoteListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if quotes.is_empty() {
        println!("No quotes in {filter}.");
    } else {
        for line in format_quote_lines(&quotes) {
            println!("{line}");
        }
    }

    Ok(())
}
