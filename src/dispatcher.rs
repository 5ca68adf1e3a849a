//! Command dispatcher shared by the one-shot CLI and the interactive session.

use anyhow::Result;
use tracing::info;

use crate::cli::formatters;
use crate::ui::progress::{CatalogSpinner, DetailProgress};
use screener::commands::Command;
use screener::config::Config;
use screener::models::PriceWindow;
use screener::pricing::QuoteSource;
use screener::screening::{ProgressEvent, RankStrategy, Screener};

/// Map a command to the window and ranking strategy it asks for
pub fn plan(command: &Command, config: &Config) -> Option<(PriceWindow, RankStrategy)> {
    match command {
        Command::Range { window, top } => Some((
            *window,
            RankStrategy::TopByYield {
                n: top.unwrap_or(config.top_range),
            },
        )),
        Command::Budget { window, top } => Some((
            *window,
            RankStrategy::TopByYield {
                n: top.unwrap_or(config.top_budget),
            },
        )),
        Command::Sections { window } => Some((
            *window,
            RankStrategy::BucketByPrice {
                bucket_size: config.bucket_size,
            },
        )),
        Command::Help | Command::Exit => None,
    }
}

/// Route a parsed command to the screener and print the outcome
pub async fn dispatch_command<S>(
    screener: &Screener<S>,
    config: &Config,
    command: Command,
    json_output: bool,
) -> Result<()>
where
    S: QuoteSource + 'static,
{
    let Some((window, strategy)) = plan(&command, config) else {
        if command == Command::Help {
            print_help();
        }
        return Ok(());
    };

    info!("Screening {:?} with {:?}", window, strategy);

    let loads_catalog =
        matches!(strategy, RankStrategy::BucketByPrice { .. }) && !screener.catalog_loaded();
    let spinner = (loads_catalog && !json_output).then(CatalogSpinner::start);

    let progress = DetailProgress::new(!json_output);
    let mut on_event = |event: &ProgressEvent| progress.handle(event);
    let outcome = screener.run(window, strategy, &mut on_event).await;

    progress.finish();
    if let Some(spinner) = spinner {
        spinner.finish();
    }

    let Some(report) = outcome? else {
        info!("Result superseded by a newer request");
        return Ok(());
    };

    if json_output {
        println!("{}", formatters::format_report_json(&report));
    } else {
        print!("{}", formatters::format_report_table(&report));
    }
    Ok(())
}

pub fn print_help() {
    println!("Help: screener <command> [options]");
    println!("\nAvailable commands:");
    println!("  range <min> <max> [top]   - Top assets by dividend yield in a price range");
    println!("  budget <max> [top]        - Top assets by dividend yield up to a budget");
    println!("  sections <min> <max>      - Cheapest, median and most expensive assets");
    println!("  help                      - Show this help");
    println!("  exit                      - Exit application");
    println!("\nPrices accept ',' or '.' as decimal separator (e.g., 10,50).");
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_plan_uses_config_defaults() {
        let config = Config::default();
        let window = PriceWindow::range(dec!(10), dec!(30)).unwrap();

        let (_, strategy) = plan(&Command::Range { window, top: None }, &config).unwrap();
        assert_eq!(strategy, RankStrategy::TopByYield { n: 30 });

        let budget = PriceWindow::budget(dec!(25)).unwrap();
        let (_, strategy) = plan(
            &Command::Budget {
                window: budget,
                top: None,
            },
            &config,
        )
        .unwrap();
        assert_eq!(strategy, RankStrategy::TopByYield { n: 100 });

        let (_, strategy) = plan(&Command::Sections { window }, &config).unwrap();
        assert_eq!(strategy, RankStrategy::BucketByPrice { bucket_size: 10 });
    }

    #[test]
    fn test_plan_explicit_top() {
        let config = Config::default();
        let window = PriceWindow::range(dec!(1), dec!(2)).unwrap();
        let (_, strategy) = plan(
            &Command::Range {
                window,
                top: Some(7),
            },
            &config,
        )
        .unwrap();
        assert_eq!(strategy, RankStrategy::TopByYield { n: 7 });
        assert!(plan(&Command::Help, &config).is_none());
    }
}
