use anyhow::Result;

use crate::cli::Commands;
use screener::commands::{budget_window, range_window, result_count, Command};

/// Convert clap `Commands` into the internal `commands::Command`.
/// Returns Ok(None) for commands handled outside the dispatcher
/// (`interactive`) and Err on invalid prices.
pub fn to_internal_command(c: &Commands) -> Result<Option<Command>> {
    match c {
        Commands::Range { min, max, top } => Ok(Some(Command::Range {
            window: range_window(min, max)?,
            top: result_count(*top)?,
        })),
        Commands::Budget { max, top } => Ok(Some(Command::Budget {
            window: budget_window(max)?,
            top: result_count(*top)?,
        })),
        Commands::Sections { min, max } => Ok(Some(Command::Sections {
            window: range_window(min, max)?,
        })),
        Commands::Interactive => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use screener::error::classify;

    #[test]
    fn test_interactive_is_not_dispatched() {
        assert!(to_internal_command(&Commands::Interactive).unwrap().is_none());
    }

    #[test]
    fn test_invalid_range_is_a_validation_error() {
        let err = to_internal_command(&Commands::Range {
            min: "30".into(),
            max: "10".into(),
            top: None,
        })
        .unwrap_err();
        assert!(classify(&err).is_some_and(|e| e.is_validation()));
    }

    #[test]
    fn test_zero_top_is_rejected_like_interactive_input() {
        for command in [
            Commands::Range {
                min: "10".into(),
                max: "30".into(),
                top: Some(0),
            },
            Commands::Budget {
                max: "25".into(),
                top: Some(0),
            },
        ] {
            let err = to_internal_command(&command).unwrap_err();
            assert!(classify(&err).is_some_and(|e| e.is_validation()));
            assert!(err.to_string().contains("not a valid result count"));
        }
        assert!(screener::commands::parse_command("range 10 30 0").is_err());
    }

    #[test]
    fn test_budget_conversion() {
        let cmd = to_internal_command(&Commands::Budget {
            max: "25,50".into(),
            top: Some(10),
        })
        .unwrap();
        assert!(matches!(cmd, Some(Command::Budget { top: Some(10), .. })));
    }
}
