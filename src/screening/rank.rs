//! Ranking strategies applied after filtering

use serde::Serialize;

use crate::models::{Asset, AssetSection};

pub const SECTION_CHEAPEST: &str = "Cheapest";
pub const SECTION_MEDIAN: &str = "Median";
pub const SECTION_MOST_EXPENSIVE: &str = "Most expensive";

/// How filtered assets are turned into output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum RankStrategy {
    /// Enrich candidates, sort by dividend yield descending, keep the top `n`
    TopByYield { n: usize },
    /// Partition the price-sorted catalog into three fixed-size sections
    BucketByPrice { bucket_size: usize },
}

/// Stable sort by dividend yield, highest first, truncated to `n`.
pub fn top_by_yield(mut assets: Vec<Asset>, n: usize) -> Vec<Asset> {
    assets.sort_by(|a, b| b.dividend_yield.cmp(&a.dividend_yield));
    assets.truncate(n);
    assets
}

/// Split an ascending price-sorted list into cheapest / median / most
/// expensive sections of at most `bucket_size` items each.
///
/// The median section starts at `len/2 - bucket_size/2` (clamped at 0), the
/// most expensive one is reversed so prices descend. Short lists produce
/// overlapping sections; empty sections are dropped.
pub fn bucket_by_price(sorted: &[Asset], bucket_size: usize) -> Vec<AssetSection> {
    let len = sorted.len();
    let take = bucket_size.min(len);

    let cheapest = sorted[..take].to_vec();

    let mid_start = (len / 2).saturating_sub(bucket_size / 2);
    let mid_end = (mid_start + bucket_size).min(len);
    let median = sorted[mid_start..mid_end].to_vec();

    let most_expensive: Vec<Asset> = sorted[len - take..].iter().rev().cloned().collect();

    [
        (SECTION_CHEAPEST, cheapest),
        (SECTION_MEDIAN, median),
        (SECTION_MOST_EXPENSIVE, most_expensive),
    ]
    .into_iter()
    .filter(|(_, assets)| !assets.is_empty())
    .map(|(title, assets)| AssetSection {
        title: title.to_string(),
        assets,
    })
    .collect()
}
