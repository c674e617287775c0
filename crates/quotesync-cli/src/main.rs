//! Quotesync CLI - collect quotes from the terminal and keep them in step
//! with a remote feed.

mod cli;
mod commands;
mod config;
mod error;


use clap::{CommandFactory, Parser};

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::categories::run_categories;
use crate::commands::common::resolve_db_path;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::export::run_export;
use crate::commands::filter::run_filter;
use crate::commands::import::run_import;
use crate::commands::list::run_list;
use crate::commands::random::run_random;
use crate::commands::sync::run_sync;
use crate::commands::watch::run_watch;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "quotesync=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let db_path = resolve_db_path(cli.db_path);

    match cli.command {
        Some(Commands::Add { text, category }) => run_add(&text, &category, &db_path).await?,
        Some(Commands::List { category, json }) => {
            run_list(category.as_deref(), json, &db_path).await?;
        }
        Some(Commands::Random { category }) => run_random(category.as_deref(), &db_path).await?,
        Some(Commands::Categories) => run_categories(&db_path).await?,
        Some(Commands::Filter { category }) => run_filter(&category, &db_path).await?,
        Some(Commands::Import { path }) => run_import(&path, &db_path).await?,
        Some(Commands::Export { output, auto_name }) => {
            run_export(output.as_deref(), auto_name, &db_path).await?;
        }
        Some(Commands::Sync { resolve }) => run_sync(resolve, &db_path).await?,
        Some(Commands::Watch { interval }) => run_watch(interval, &db_path).await?,
        Some(Commands::Completions { shell, output }) => {
            run_completions(shell, output.as_deref())?;
        }
        Some(Commands::Config { command }) => run_config(command)?,
        None => {
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
