use clap::Parser;

mod backend;
mod cli;
mod commands;
mod domain;
mod error;
mod services;

use backend::HttpBackend;
use cli::{Cli, Commands};
use error::{error_code, CliError};
use services::config::{load_settings, Overrides};
use services::{logging, output::print_error};

fn run(cli: &Cli) -> anyhow::Result<()> {
    if let Commands::History { limit } = &cli.command {
        return commands::dashboard::handle_history(cli.json, *limit);
    }

    let overrides = Overrides {
        base_url: cli.base_url.clone(),
        timeout_ms: cli.timeout_ms,
    };
    let settings =
        load_settings(&overrides).map_err(|e| CliError::InvalidInput(format!("{:#}", e)))?;
    tracing::debug!(base_url = %settings.base_url, timeout_ms = settings.timeout_ms, "settings resolved");
    let api = HttpBackend::new(&settings.base_url, settings.timeout_ms)?;
    commands::dispatch(cli, &settings, &api)
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    if let Err(e) = run(&cli) {
        tracing::debug!(error = ?e, "command failed");
        print_error(cli.json, error_code(&e), &e.to_string());
        std::process::exit(1);
    }
}
