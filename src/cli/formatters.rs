//! Output formatting module for CLI display
//!
//! This module handles all terminal output formatting, separating
//! the concerns of screening from presentation.

use colored::Colorize;
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

use screener::models::{Asset, PriceWindow};
use screener::screening::{RankStrategy, ScreenOutput, ScreenReport};
use screener::utils::{format_brl, format_yield};

#[derive(Tabled)]
struct AssetRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Type")]
    asset_type: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Dividend Yield")]
    dividend_yield: String,
    #[tabled(rename = "Logo")]
    logo: String,
}

/// Heading describing what was asked for
pub fn report_title(report: &ScreenReport) -> String {
    let span = match report.window {
        PriceWindow::Range(range) => format!(
            "between {} and {}",
            format_brl(range.min()),
            format_brl(range.max())
        ),
        PriceWindow::Budget { max } => format!("up to {}", format_brl(max)),
    };
    match report.strategy {
        RankStrategy::TopByYield { n } => format!("Top {} assets by dividend yield {}", n, span),
        RankStrategy::BucketByPrice { .. } => format!("Assets {}", span),
    }
}

fn asset_table(assets: &[Asset]) -> String {
    let rows: Vec<AssetRow> = assets
        .iter()
        .enumerate()
        .map(|(i, a)| AssetRow {
            rank: i + 1,
            ticker: a.ticker.clone(),
            asset_type: a.asset_type.label().to_string(),
            price: format_brl(a.price),
            dividend_yield: if a.dividend_yield.is_zero() {
                format_yield(a.dividend_yield).bright_black().to_string()
            } else {
                format_yield(a.dividend_yield).green().to_string()
            },
            logo: if a.has_logo() { "✓" } else { "-" }.to_string(),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    // Right-align rank, price and yield
    table.modify(Columns::new(0..1), Alignment::right());
    table.modify(Columns::new(3..5), Alignment::right());
    table.to_string()
}

/// Format a screening report for terminal table output
pub fn format_report_table(report: &ScreenReport) -> String {
    let mut output = format!("\n{} {}\n\n", "📊".cyan().bold(), report_title(report).bold());

    if report.output.is_empty() {
        output.push_str(&format_empty_result());
        return output;
    }

    match &report.output {
        ScreenOutput::Ranked(assets) => {
            output.push_str(&asset_table(assets));
            output.push('\n');
        }
        ScreenOutput::Sections(sections) => {
            for section in sections {
                output.push_str(&format!(
                    "{} ({})\n",
                    section.title.bold().underline(),
                    section.assets.len()
                ));
                output.push_str(&asset_table(&section.assets));
                output.push_str("\n\n");
            }
        }
    }

    output
}

/// Format a screening report as pretty JSON
pub fn format_report_json(report: &ScreenReport) -> String {
    serde_json::to_string_pretty(report)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// Format empty result message
pub fn format_empty_result() -> String {
    format!(
        "{} No assets found with these criteria\n",
        "ℹ".blue().bold()
    )
}

/// Format a whole-operation failure for the user
pub fn format_error(err: &anyhow::Error) -> String {
    match screener::error::classify(err) {
        Some(e) if e.is_validation() => format!("{} Invalid input: {}", "⚠".yellow().bold(), e),
        _ => format!("{} {:#}", "❌".red(), err),
    }
}
