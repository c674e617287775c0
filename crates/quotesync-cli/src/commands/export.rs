use std::path::{Path, PathBuf};

use chrono::Utc;
use quotesync_core::export::suggested_export_file_name;

use crate::commands::common::open_service;
use crate::error::CliError;

pub async fn run_export(
    output_path: Option<&Path>,
    auto_name: bool,
    db_path: &Path,
) -> Result<(), CliError> {
    let service = open_service(db_path)?;
    let rendered = service.export_json().await?;

    let target = if auto_name {
        Some(PathBuf::from(suggested_export_file_name(Utc::now())))
    } else {
        output_path.map(Path::to_path_buf)
    };

    if let Some(path) = target {
        std::fs::write(&path, rendered)?;
        println!("{}", path.display());
    } else {
        println!("{rendered}");
    }

    Ok(())
}
