//! Interactive session
//!
//! A readline loop over one [`Screener`], so the catalog loaded by the first
//! `sections` command is reused by every later one.

pub mod progress;
pub mod readline;

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;

use crate::cli::formatters::format_error;
use crate::dispatcher::dispatch_command;
use screener::commands::{parse_command, Command};
use screener::config::Config;
use screener::pricing::QuoteSource;
use screener::screening::Screener;

const COMMAND_PATTERNS: &[&str] = &["range", "budget", "sections", "help", "exit", "quit"];

/// Launch the interactive REPL.
pub async fn run_interactive<S>(screener: &Screener<S>, config: &Config, json: bool) -> Result<()>
where
    S: QuoteSource + 'static,
{
    println!("{}", "Screener - Interactive Mode".bold());
    println!(
        "Type {} for help, {} to exit\n",
        "help".cyan(),
        "exit".cyan()
    );

    let mut rl = readline::Readline::new(COMMAND_PATTERNS, None)?;

    loop {
        match rl.readline("screener> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                match parse_command(trimmed) {
                    Ok(Command::Exit) => {
                        println!("Goodbye!");
                        break;
                    }
                    Ok(cmd) => {
                        if let Err(e) = dispatch_command(screener, config, cmd, json).await {
                            eprintln!("{}", format_error(&e));
                        }
                    }
                    Err(e) => {
                        eprintln!("{} {}", "Parse error:".yellow().bold(), e.message);
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("{} {}", "Error:".red().bold(), err);
                break;
            }
        }
    }

    Ok(())
}
