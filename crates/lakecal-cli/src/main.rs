//! lakecal CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use lakecal_cli::cli::{Cli, Command, ConfigAction, output_format};
use lakecal_cli::commands;
use lakecal_cli::commands::calendar::CalendarRange;
use lakecal_cli::config::ClientConfig;
use lakecal_cli::error::{ClientError, ClientResult};
use lakecal_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let config_path = cli.config.clone().unwrap_or_else(ClientConfig::default_path);
    let config = if cli.config.is_some() {
        ClientConfig::load_from(&config_path).map_err(ClientError::Config)?
    } else {
        ClientConfig::load().map_err(ClientError::Config)?
    };

    let tracing_config = if cli.debug || config.debug {
        TracingConfig::cli_debug()
    } else if matches!(cli.command, Command::Watch { .. }) {
        TracingConfig::watch()
    } else {
        TracingConfig::default()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: logging disabled: {}", e);
    }

    match cli.command {
        Command::Apartments { json } => commands::apartments::run(&config, output_format(json)),
        Command::Intervals { apartment, json } => {
            commands::intervals::run(&config, &apartment, output_format(json)).await
        }
        Command::Calendar {
            apartment,
            month,
            months,
            today,
            json,
        } => {
            let range = CalendarRange::resolve(month, months, today);
            commands::calendar::run(&config, &apartment, range, output_format(json)).await
        }
        Command::Parse { file, json } => commands::parse::run(&file, output_format(json)),
        Command::Watch {
            apartment,
            interval,
        } => commands::watch::run(&config, &apartment, interval).await,
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(&config, &config_path),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(&config_path),
        },
    }
}
