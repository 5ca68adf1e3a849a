// Pricing module - quote sources feeding the screener

pub mod brapi;

pub use brapi::BrapiClient;

use std::future::Future;

use crate::error::Result;
use crate::models::{Asset, AssetSummary};

/// Source of quote data for the screening pipeline.
///
/// [`BrapiClient`] is the production implementation; tests drive the
/// pipeline with in-memory sources.
pub trait QuoteSource: Send + Sync {
    /// Bulk list of tickers with their last price, in upstream order.
    /// Fails on transport errors, HTTP 429 and malformed payloads.
    fn fetch_list(
        &self,
        limit: Option<usize>,
    ) -> impl Future<Output = Result<Vec<AssetSummary>>> + Send;

    /// Details for one ticker. `None` means "skip this asset": missing
    /// price/symbol and transport failures never propagate.
    fn fetch_details(&self, ticker: &str) -> impl Future<Output = Option<Asset>> + Send;

    /// Larger list already carrying logo and type, used as a cached catalog.
    fn fetch_catalog(
        &self,
        limit: usize,
        require_logo: bool,
    ) -> impl Future<Output = Result<Vec<Asset>>> + Send;
}
