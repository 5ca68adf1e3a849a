//! Command parsing and routing layer
//!
//! A small parser for commands typed in the interactive session. The clap
//! CLI converts into the same [`Command`] so both paths share one
//! dispatcher.

use crate::error::ScreenerError;
use crate::models::PriceWindow;
use crate::utils::{parse_budget, parse_price};

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Top assets by dividend yield in a price range: `range <min> <max> [top]`
    Range {
        window: PriceWindow,
        top: Option<usize>,
    },
    /// Top assets by dividend yield up to a per-share budget: `budget <max> [top]`
    Budget {
        window: PriceWindow,
        top: Option<usize>,
    },
    /// Cheapest / median / most expensive sections: `sections <min> <max>`
    Sections { window: PriceWindow },
    /// Show help
    Help,
    /// Exit/quit
    Exit,
}

/// Error type for command parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandParseError {
    pub message: String,
}

impl std::fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CommandParseError {}

impl From<ScreenerError> for CommandParseError {
    fn from(err: ScreenerError) -> Self {
        Self {
            message: match err {
                ScreenerError::Validation(msg) => msg,
                other => other.to_string(),
            },
        }
    }
}

fn usage(message: &str) -> CommandParseError {
    CommandParseError {
        message: message.to_string(),
    }
}

fn parse_top(arg: Option<&&str>) -> Result<Option<usize>, CommandParseError> {
    match arg {
        None => Ok(None),
        Some(s) => match s.parse::<usize>() {
            Ok(n) => Ok(result_count(Some(n))?),
            Err(_) => Err(usage(&format!("'{}' is not a valid result count", s))),
        },
    }
}

/// An explicit result count must be at least one
pub fn result_count(top: Option<usize>) -> Result<Option<usize>, ScreenerError> {
    match top {
        Some(0) => Err(ScreenerError::Validation(
            "'0' is not a valid result count".to_string(),
        )),
        other => Ok(other),
    }
}

/// Build a price-range window from user strings
pub fn range_window(min: &str, max: &str) -> Result<PriceWindow, ScreenerError> {
    PriceWindow::range(parse_price(min)?, parse_price(max)?)
}

/// Build a budget window from a user string
pub fn budget_window(max: &str) -> Result<PriceWindow, ScreenerError> {
    PriceWindow::budget(parse_budget(max)?)
}

/// Parse one line of interactive input. A leading `/` is accepted.
pub fn parse_command(input: &str) -> Result<Command, CommandParseError> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    let Some(first) = tokens.first() else {
        return Err(usage("Empty command"));
    };

    match first.trim_start_matches('/').to_lowercase().as_str() {
        "range" | "r" => {
            if tokens.len() < 3 || tokens.len() > 4 {
                return Err(usage("Usage: range <min> <max> [top]"));
            }
            Ok(Command::Range {
                window: range_window(tokens[1], tokens[2])?,
                top: parse_top(tokens.get(3))?,
            })
        }
        "budget" | "b" => {
            if tokens.len() < 2 || tokens.len() > 3 {
                return Err(usage("Usage: budget <max> [top]"));
            }
            Ok(Command::Budget {
                window: budget_window(tokens[1])?,
                top: parse_top(tokens.get(2))?,
            })
        }
        "sections" | "s" => {
            if tokens.len() != 3 {
                return Err(usage("Usage: sections <min> <max>"));
            }
            Ok(Command::Sections {
                window: range_window(tokens[1], tokens[2])?,
            })
        }
        "help" | "?" => Ok(Command::Help),
        "exit" | "quit" | "q" => Ok(Command::Exit),
        other => Err(usage(&format!(
            "Unknown command: {}. Type 'help' for available commands",
            other
        ))),
    }
}
