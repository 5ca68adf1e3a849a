mod cli;
mod dispatcher;
mod ui;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

use screener::config::Config;
use screener::pricing::BrapiClient;
use screener::screening::{ScreenLimits, Screener};

/// Used when `RUST_LOG` is unset or invalid
const DEFAULT_LOG_FILTER: &str = "warn";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging; stderr keeps stdout clean for tables and JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(!cli.no_color)
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli).await {
        eprintln!("{}", cli::formatters::format_error(&e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Validate arguments before any configuration or network work
    let command = match &cli.command {
        Some(c) => cli::runner::to_internal_command(c)?,
        None => None,
    };

    let config = Config::load()?;
    let client = BrapiClient::new(&config)?;
    let screener = Screener::new(client, ScreenLimits::from(&config));

    match command {
        Some(cmd) => dispatcher::dispatch_command(&screener, &config, cmd, cli.json).await,
        // No subcommand or `interactive`
        None => ui::run_interactive(&screener, &config, cli.json).await,
    }
}
