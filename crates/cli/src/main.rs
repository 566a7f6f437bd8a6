mod args;
mod report;

use anyhow::{Context, Result};
use clap::{error::ErrorKind, CommandFactory, Parser};
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mediaconv_core::{
    load_config, load_config_from_env, validate_config, Config, ConversionDispatcher,
};

use args::{Cli, Command, TargetFormat};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if std::env::args_os().len() <= 1 {
        let _ = Cli::command().print_help();
        return ExitCode::SUCCESS;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("Fatal error: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Runs the requested command; `Ok(false)` means the conversion failed.
async fn run(cli: Cli) -> Result<bool> {
    let command = match cli.resolve() {
        Ok(command) => command,
        Err(reason) => {
            eprintln!("Error: {}\n", reason);
            let _ = Cli::command().print_help();
            return Ok(false);
        }
    };

    let (input, output, target) = match command {
        Command::ListFormats => {
            print!("{}", report::format_list());
            return Ok(true);
        }
        Command::Convert {
            input,
            output,
            target,
        } => (input, output, target),
    };

    let config = load(&cli)?;
    let dispatcher = ConversionDispatcher::new(&config);
    debug!(?dispatcher, "Dispatcher ready");

    if let TargetFormat::Unrecognised(name) = &target {
        eprintln!(
            "Warning: unknown format '{}', using the output file extension",
            name
        );
    }

    let result = dispatcher
        .convert_file(&input, &output, target.file_type())
        .await;
    let report = report::conversion_report(&result);
    if result.success {
        print!("{}", report);
    } else {
        eprint!("{}", report);
    }
    Ok(result.success)
}

fn load(cli: &Cli) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => load_config_from_env().context("Failed to load config from environment")?,
    };
    validate_config(&config).context("Configuration validation failed")?;
    Ok(config)
}
