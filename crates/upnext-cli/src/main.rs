//! upnext CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use upnext_cli::cli::{Cli, Command, ConfigAction, LogFormat};
use upnext_cli::config::AppConfig;
use upnext_cli::error::{AppError, AppResult};
use upnext_core::{TracingConfig, TracingOutputFormat, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing before anything can log
    let tracing_config = if cli.debug {
        TracingConfig::verbose()
    } else {
        TracingConfig::default()
    };
    let tracing_config = tracing_config.with_format(match cli.log_format {
        LogFormat::Compact => TracingOutputFormat::Compact,
        LogFormat::Json => TracingOutputFormat::Json,
    });
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: failed to initialize logging: {e}");
    }

    // Run the command
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = AppConfig::load_or_default(cli.config.as_deref()).map_err(AppError::config)?;
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_path);

    match cli.command {
        None | Some(Command::Cycle) => upnext_cli::commands::cycle::run(&config).await,
        Some(Command::Preview) => upnext_cli::commands::preview::run(&config).await,
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => upnext_cli::commands::config::dump(&config, &config_path),
            ConfigAction::Validate => upnext_cli::commands::config::validate(&config),
            ConfigAction::Path => upnext_cli::commands::config::path(&config_path),
        },
    }
}
