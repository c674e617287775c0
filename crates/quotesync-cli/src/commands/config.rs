use crate::cli::ConfigCommands;
use crate::config::{default_config_path, CliConfig};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            endpoint,
            fetch_limit,
            interval,
            timeout,
        } => run_config_init(endpoint, fetch_limit, interval, timeout),
        ConfigCommands::Show => run_config_show(),
    }
}

fn run_config_init(
    endpoint: Option<String>,
    fetch_limit: Option<usize>,
    interval: Option<u64>,
    timeout: Option<u64>,
) -> Result<(), CliError> {
    let config = CliConfig::load().map_err(CliError::Config)?;
    let updated = apply_config_updates(config, endpoint, fetch_limit, interval, timeout)?;

    let path = updated.save().map_err(CliError::Config)?;
    println!("Saved config to {}", path.display());
    Ok(())
}

/// Merge explicit values into `config`, rejecting a result that fails validation.
pub fn apply_config_updates(
    mut config: CliConfig,
    endpoint: Option<String>,
    fetch_limit: Option<usize>,
    interval: Option<u64>,
    timeout: Option<u64>,
) -> Result<CliConfig, CliError> {
    let mut settings = config.sync.with_endpoint_override(endpoint);
    if let Some(fetch_limit) = fetch_limit {
        settings.fetch_limit = fetch_limit;
    }
    if let Some(interval) = interval {
        settings.sync_interval_secs = interval;
    }
    if let Some(timeout) = timeout {
        settings.request_timeout_secs = timeout;
    }

    config.sync = settings.validate().map_err(CliError::Config)?;
    Ok(config)
}

fn run_config_show() -> Result<(), CliError> {
    let config = CliConfig::load().map_err(CliError::Config)?;
    let settings = config.effective_settings().map_err(CliError::Config)?;

    println!("config file:    {}", default_config_path().display());
    println!("endpoint:       {}", settings.remote_endpoint);
    println!("fetch limit:    {}", settings.fetch_limit);
    println!("sync interval:  {}s", settings.sync_interval_secs);
    println!("timeout:        {}s", settings.request_timeout_secs);
    Ok(())
}
