//! Terminal progress rendering for screening runs

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use screener::screening::ProgressEvent;

/// Progress bar driven by detail-fetch events; hidden in JSON mode
pub struct DetailProgress {
    bar: ProgressBar,
}

impl DetailProgress {
    pub fn new(visible: bool) -> Self {
        let bar = if visible {
            ProgressBar::new(0)
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) =
            ProgressStyle::with_template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("=> "));
        }
        Self { bar }
    }

    pub fn handle(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { total } => {
                self.bar.set_length(*total as u64);
                self.bar.set_message(event.message());
            }
            ProgressEvent::Fetched { .. } | ProgressEvent::Skipped { .. } => {
                self.bar.inc(1);
                self.bar.set_message(event.message());
            }
        }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    #[cfg(test)]
    fn position(&self) -> (u64, Option<u64>) {
        (self.bar.position(), self.bar.length())
    }
}

/// Spinner shown while the catalog is downloaded
pub struct CatalogSpinner {
    bar: ProgressBar,
}

impl CatalogSpinner {
    pub fn start() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_message("Loading asset catalog...");
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}
