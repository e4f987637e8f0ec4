//! Configuration commands.

use std::path::Path;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};

/// Dump the current configuration to stdout.
pub fn dump(config: &AppConfig, path: &Path) -> AppResult<()> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| AppError::config(format!("failed to serialize config: {e}")))?;
    println!("# config.toml ({})", path.display());
    println!("{toml_str}");

    Ok(())
}

/// Validate the configuration.
pub fn validate(config: &AppConfig) -> AppResult<()> {
    config.validate().map_err(AppError::config)?;
    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path(path: &Path) -> AppResult<()> {
    println!("config: {}", path.display());
    Ok(())
}
