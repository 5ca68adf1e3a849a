use clap::{Parser, Subcommand};

pub mod formatters;
pub mod runner;

#[derive(Parser)]
#[command(name = "screener")]
#[command(version, about = "Brazilian B3 asset screener by price and dividend yield")]
#[command(
    long_about = "Fetch B3 quotes from brapi.dev, keep the assets inside a price range or per-share budget, and rank them by dividend yield or split them into cheapest, median and most expensive sections."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank assets priced between MIN and MAX by dividend yield
    Range {
        /// Minimum price per share (e.g., 10 or 10,50)
        min: String,

        /// Maximum price per share
        max: String,

        /// Number of assets to show (default from config, 30)
        #[arg(short, long)]
        top: Option<usize>,
    },

    /// Rank assets priced up to a per-share budget by dividend yield
    Budget {
        /// Maximum investment per share
        max: String,

        /// Number of assets to show (default from config, 100)
        #[arg(short, long)]
        top: Option<usize>,
    },

    /// Show cheapest, median and most expensive assets between MIN and MAX
    Sections {
        /// Minimum price per share
        min: String,

        /// Maximum price per share
        max: String,
    },

    /// Launch interactive mode
    Interactive,
}
