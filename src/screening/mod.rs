//! Screening pipeline: price filter → candidate cap → enrichment → ranking
//!
//! A [`Screener`] owns one quote source for its whole lifetime (a CLI run or
//! an interactive session). It caches the full catalog after the first
//! successful load and only publishes the result of the most recently
//! issued request.

pub mod enrich;
pub mod filter;
pub mod progress;
pub mod rank;

pub use progress::ProgressEvent;
pub use rank::RankStrategy;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::Result;
use crate::models::{Asset, AssetSection, PriceWindow};
use crate::pricing::QuoteSource;

/// Pipeline limits taken from [`Config`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLimits {
    pub candidate_cap: usize,
    pub catalog_limit: usize,
    pub require_logo: bool,
}

impl Default for ScreenLimits {
    fn default() -> Self {
        ScreenLimits::from(&Config::default())
    }
}

impl From<&Config> for ScreenLimits {
    fn from(config: &Config) -> Self {
        Self {
            candidate_cap: config.candidate_cap,
            catalog_limit: config.catalog_limit,
            require_logo: config.require_logo,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ScreenOutput {
    Ranked(Vec<Asset>),
    Sections(Vec<AssetSection>),
}

impl ScreenOutput {
    pub fn is_empty(&self) -> bool {
        match self {
            ScreenOutput::Ranked(assets) => assets.is_empty(),
            ScreenOutput::Sections(sections) => sections.is_empty(),
        }
    }
}

/// Result of one calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreenReport {
    pub request_id: u64,
    pub window: PriceWindow,
    pub strategy: RankStrategy,
    pub output: ScreenOutput,
    pub generated_at: DateTime<Utc>,
}

pub struct Screener<S> {
    source: Arc<S>,
    limits: ScreenLimits,
    catalog: OnceCell<Vec<Asset>>,
    latest_request: AtomicU64,
    published: Mutex<Option<ScreenReport>>,
}

impl<S: QuoteSource + 'static> Screener<S> {
    pub fn new(source: S, limits: ScreenLimits) -> Self {
        Self {
            source: Arc::new(source),
            limits,
            catalog: OnceCell::new(),
            latest_request: AtomicU64::new(0),
            published: Mutex::new(None),
        }
    }

    /// Full catalog, fetched on first use and reused afterwards.
    /// A failed load is not cached.
    pub async fn catalog(&self) -> Result<&[Asset]> {
        let catalog = self
            .catalog
            .get_or_try_init(|| async {
                self.source
                    .fetch_catalog(self.limits.catalog_limit, self.limits.require_logo)
                    .await
            })
            .await?;
        Ok(catalog.as_slice())
    }

    pub fn catalog_loaded(&self) -> bool {
        self.catalog.initialized()
    }

    /// Run one calculation without touching the published state.
    pub async fn screen<F>(
        &self,
        request_id: u64,
        window: PriceWindow,
        strategy: RankStrategy,
        progress: &mut F,
    ) -> Result<ScreenReport>
    where
        F: FnMut(&ProgressEvent),
    {
        window.validate()?;

        let output = match strategy {
            RankStrategy::TopByYield { n } => {
                let list = self
                    .source
                    .fetch_list(None)
                    .await
                    .context("Failed to load quote list")?;
                let total = list.len();

                let filtered = filter::filter_by_price(list, &window);
                let candidates = filter::cap_candidates(filtered, self.limits.candidate_cap);
                info!(
                    "Request {}: {} of {} quotes selected as candidates",
                    request_id,
                    candidates.len(),
                    total
                );

                let enriched =
                    enrich::enrich_candidates(Arc::clone(&self.source), candidates, progress)
                        .await;
                let in_window: Vec<Asset> = enriched
                    .into_iter()
                    .filter(|asset| {
                        let keep = window.contains(asset.price);
                        if !keep {
                            debug!("{} moved out of the price window ({})", asset.ticker, asset.price);
                        }
                        keep
                    })
                    .collect();

                ScreenOutput::Ranked(rank::top_by_yield(in_window, n))
            }
            RankStrategy::BucketByPrice { bucket_size } => {
                let catalog = self.catalog().await?;
                let filtered = filter::filter_by_price(catalog.to_vec(), &window);
                debug!(
                    "Request {}: {} of {} catalog entries in window",
                    request_id,
                    filtered.len(),
                    catalog.len()
                );
                ScreenOutput::Sections(rank::bucket_by_price(&filtered, bucket_size))
            }
        };

        Ok(ScreenReport {
            request_id,
            window,
            strategy,
            output,
            generated_at: Utc::now(),
        })
    }

    /// Issue a new request id; later ids supersede earlier ones.
    pub fn begin_request(&self) -> u64 {
        self.latest_request.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Store `report` if it belongs to the latest issued request.
    pub fn publish(&self, report: ScreenReport) -> bool {
        let mut published = self.published.lock().unwrap_or_else(PoisonError::into_inner);
        if report.request_id != self.latest_request.load(Ordering::SeqCst) {
            debug!("Discarding superseded request {}", report.request_id);
            return false;
        }
        *published = Some(report);
        true
    }

    /// Begin, screen and publish. `Ok(None)` when a newer request was issued
    /// while this one was running.
    pub async fn run<F>(
        &self,
        window: PriceWindow,
        strategy: RankStrategy,
        progress: &mut F,
    ) -> Result<Option<ScreenReport>>
    where
        F: FnMut(&ProgressEvent),
    {
        let request_id = self.begin_request();
        let report = self.screen(request_id, window, strategy, progress).await?;
        if self.publish(report.clone()) {
            Ok(Some(report))
        } else {
            Ok(None)
        }
    }

    /// Last published report
    pub fn latest(&self) -> Option<ScreenReport> {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
