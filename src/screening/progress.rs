/// Typed progress events emitted while candidate details are fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Detail fetches issued for `total` candidates
    Started { total: usize },
    /// One candidate enriched; `done` counts completions in finish order
    Fetched {
        ticker: String,
        done: usize,
        total: usize,
    },
    /// One candidate dropped (missing data or failed request)
    Skipped {
        ticker: String,
        done: usize,
        total: usize,
    },
}

impl ProgressEvent {
    pub fn message(&self) -> String {
        match self {
            ProgressEvent::Started { total } => format!("Fetching details for {} assets", total),
            ProgressEvent::Fetched {
                ticker,
                done,
                total,
            } => format!("{} ({}/{})", ticker, done, total),
            ProgressEvent::Skipped {
                ticker,
                done,
                total,
            } => format!("{} → skipped ({}/{})", ticker, done, total),
        }
    }
}
