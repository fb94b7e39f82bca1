//! ROSTER CLI entry point.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use roster_catalog::{CatalogBrowser, RecordRepository};
use roster_cli::cli::Cli;
use roster_cli::commands::execute;
use roster_cli::config::RosterConfig;
use roster_cli::error::CliError;
use roster_cli::telemetry::init_tracing;
use roster_source::HttpRecordSource;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("roster: {}", err);
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = RosterConfig::load(cli.config.as_deref())?;
    init_tracing(&config)?;

    let source = HttpRecordSource::new(&config.source_config())?;
    let repository = RecordRepository::in_memory(
        Arc::new(source),
        &config.catalog_config(),
        config.cache_config(),
    )?;
    let browser = CatalogBrowser::new(Arc::new(repository));

    let output = execute(&browser, &cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
