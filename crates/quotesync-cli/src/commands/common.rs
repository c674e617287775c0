use std::env;
use std::path::{Path, PathBuf};

use quotesync_core::config::SyncSettings;
use quotesync_core::remote::HttpRemoteGateway;
use quotesync_core::services::QuoteService;
use quotesync_core::sync::SyncOrchestrator;
use quotesync_core::{CategoryFilter, Conflict, QuoteRecord, QuoteSource};
use serde::Serialize;

use crate::config::CliConfig;
use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct QuoteListItem {
    pub id: String,
    pub text: String,
    pub category: String,
    pub source: QuoteSource,
    pub last_modified: i64,
    pub last_modified_iso: String,
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os("QUOTESYNC_DB_PATH").map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quotesync")
        .join("quotes.db")
}

pub fn open_service(path: &Path) -> Result<QuoteService, CliError> {
    Ok(QuoteService::open_path(path)?)
}

pub fn load_settings() -> Result<SyncSettings, CliError> {
    CliConfig::load()
        .and_then(|config| config.effective_settings())
        .map_err(CliError::Config)
}

pub fn open_orchestrator(
    path: &Path,
    settings: &SyncSettings,
) -> Result<SyncOrchestrator<HttpRemoteGateway>, CliError> {
    let service = open_service(path)?;
    let gateway = HttpRemoteGateway::new(&settings.remote_endpoint, settings.request_timeout())?;
    Ok(SyncOrchestrator::new(service, gateway, settings.fetch_limit))
}

/// Explicit `--category` wins; otherwise the saved filter applies.
pub async fn resolve_filter(
    explicit: Option<&str>,
    service: &QuoteService,
) -> Result<CategoryFilter, CliError> {
    match explicit {
        Some(category) => Ok(CategoryFilter::parse(category)),
        None => Ok(service.current_filter().await?),
    }
}

/// Join argument words into quote text, or `None` when blank.
pub fn normalize_text(parts: &[String]) -> Option<String> {
    let joined = parts.join(" ");
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn format_quote_lines(quotes: &[QuoteRecord]) -> Vec<String> {
    quotes
        .iter()
        .map(|quote| {
            format!(
                "{:<6}  {:<14}  \"{}\"",
                quote.source.to_string(),
                quote.category,
                quote.text
            )
        })
        .collect()
}

pub fn format_quote(quote: &QuoteRecord) -> String {
    format!("\"{}\"\n  ({})", quote.text, quote.category)
}

pub fn format_last_viewed(quote: &QuoteRecord) -> String {
    format!("Now showing: {}", format_quote(quote))
}

pub fn quote_to_list_item(quote: &QuoteRecord) -> QuoteListItem {
    QuoteListItem {
        id: quote.id.to_string(),
        text: quote.text.clone(),
        category: quote.category.clone(),
        source: quote.source,
        last_modified: quote.last_modified,
        last_modified_iso: format_timestamp(quote.last_modified),
    }
}

pub fn format_conflict_lines(conflicts: &[Conflict]) -> Vec<String> {
    conflicts
        .iter()
        .map(|conflict| {
            format!(
                "\"{}\"  local={} ({})  server={} ({})",
                conflict.local.text,
                conflict.local.category,
                conflict.local.source,
                conflict.remote.category,
                conflict.remote.source
            )
        })
        .collect()
}

pub fn format_timestamp(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms).map_or_else(
        || timestamp_ms.to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}
