use clap::Parser;
use owo_colors::{OwoColorize, Style};
use planme_core::error::CoreError;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod parser;
mod util;
mod views;

fn main() {
    init_tracing();

    let cli = cli::Cli::parse();

    let mut config = config::Config::new().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load configuration, using defaults");
        config::Config::default()
    });
    if let Some(output) = cli.output {
        config.output = output;
    }

    let result = match cli.command {
        cli::Commands::Preview(command) => commands::preview::preview(command, &config),
        cli::Commands::Plan(command) => commands::plan::plan(command, &config),
        cli::Commands::Next(command) => commands::next::next(command, &config),
        cli::Commands::Weekdays(command) => commands::weekdays::weekdays(command),
    };

    if let Err(e) = result {
        handle_error(e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    match err.chain().find_map(|cause| cause.downcast_ref::<CoreError>()) {
        Some(CoreError::InvalidRule(s)) => {
            eprintln!("{} Invalid rule: {}", "Error:".style(error_style), s.yellow());
        }
        Some(CoreError::InvalidInput(s)) => {
            eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
        }
        Some(core_error @ (CoreError::InvalidWeekday(_) | CoreError::InvalidJsDay(_))) => {
            eprintln!("{} {}", "Error:".style(error_style), core_error);
        }
        None => {
            eprintln!("{} {:#}", "Error:".style(error_style), err);
        }
    }
}
