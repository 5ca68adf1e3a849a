//! Concurrent detail enrichment of price-filtered candidates

use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::progress::ProgressEvent;
use crate::models::{Asset, AssetSummary};
use crate::pricing::QuoteSource;

/// Fetch details for every candidate concurrently and wait for all of them.
///
/// Skips (missing data, failed requests, panicked tasks) are dropped. The
/// surviving assets keep the candidates' order, not completion order.
pub async fn enrich_candidates<S, F>(
    source: Arc<S>,
    candidates: Vec<AssetSummary>,
    progress: &mut F,
) -> Vec<Asset>
where
    S: QuoteSource + 'static,
    F: FnMut(&ProgressEvent),
{
    let total = candidates.len();
    progress(&ProgressEvent::Started { total });

    let mut join_set = JoinSet::new();
    for (index, candidate) in candidates.into_iter().enumerate() {
        let source = Arc::clone(&source);
        join_set.spawn(async move {
            let details = source.fetch_details(&candidate.ticker).await;
            (index, candidate.ticker, details)
        });
    }

    let mut slots: Vec<Option<Asset>> = vec![None; total];
    let mut done = 0;

    while let Some(joined) = join_set.join_next().await {
        done += 1;
        match joined {
            Ok((index, ticker, Some(asset))) => {
                progress(&ProgressEvent::Fetched { ticker, done, total });
                slots[index] = Some(asset);
            }
            Ok((_, ticker, None)) => {
                progress(&ProgressEvent::Skipped { ticker, done, total });
            }
            Err(e) => {
                warn!("Detail fetch task failed: {}", e);
                progress(&ProgressEvent::Skipped {
                    ticker: String::from("?"),
                    done,
                    total,
                });
            }
        }
    }

    let enriched: Vec<Asset> = slots.into_iter().flatten().collect();
    debug!("Enriched {} of {} candidates", enriched.len(), total);
    enriched
}
