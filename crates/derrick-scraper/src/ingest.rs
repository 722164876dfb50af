//! The sequential ingest loop.
//!
//! One identifier at a time: fetch, assemble, upsert, pause. A failure at
//! any step logs the identifier it happened on and moves to the next one;
//! the batch never aborts. The pause between identifiers keeps request
//! pacing polite; the portal publishes no rate limit.

use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use derrick_core::{assemble, Assembled, DerrickError, Well};
use derrick_store::{StoreError, WellStore};

use crate::fetch::WellFetcher;

/// Why one identifier was skipped.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The portal fetch failed after retries.
    #[error("fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The fetched document was unreadable.
    #[error("document unreadable: {0}")]
    Assemble(#[from] DerrickError),

    /// Persisting the record failed.
    #[error("persistence failed: {0}")]
    Store(#[from] StoreError),
}

/// Counters for one ingest run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Identifiers taken from the input list.
    pub attempted: usize,
    /// Records fetched, assembled, and persisted.
    pub saved: usize,
    /// Identifiers skipped after a failure.
    pub failed: usize,
}

/// Reads the identifier list: one API number per line, UTF-8, no header.
///
/// A leading UTF-8 BOM is stripped, surrounding whitespace is trimmed, and
/// blank lines are skipped.
pub fn read_api_numbers(path: impl AsRef<Path>) -> io::Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// The sequential scrape-and-persist pipeline.
pub struct Ingestor {
    fetcher: WellFetcher,
    store: WellStore,
    delay: Duration,
    default_crs: Option<String>,
}

impl Ingestor {
    /// Creates a pipeline over the given fetcher and store.
    #[must_use]
    pub fn new(
        fetcher: WellFetcher,
        store: WellStore,
        delay: Duration,
        default_crs: Option<String>,
    ) -> Self {
        Self {
            fetcher,
            store,
            delay,
            default_crs,
        }
    }

    /// Processes every identifier in order, pausing between them.
    ///
    /// Failures are logged with the identifier they belong to and counted
    /// in the summary; the run always reaches the end of the list.
    pub async fn run(&self, api_numbers: &[String]) -> IngestSummary {
        let mut summary = IngestSummary::default();

        for (index, api_number) in api_numbers.iter().enumerate() {
            summary.attempted += 1;
            match self.process(api_number).await {
                Ok(()) => {
                    summary.saved += 1;
                    tracing::info!(api_number, "well saved");
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::warn!(api_number, error = %e, "skipping identifier");
                }
            }

            if index + 1 < api_numbers.len() {
                tokio::time::sleep(self.delay).await;
            }
        }

        summary
    }

    async fn process(&self, api_number: &str) -> Result<(), IngestError> {
        let html = self.fetcher.fetch(api_number).await?;
        let assembled = assemble(api_number, &html)?;
        for skip in &assembled.skipped {
            tracing::warn!(
                api_number,
                field = skip.field.name(),
                raw = %skip.raw,
                reason = %skip.reason,
                "field dropped"
            );
        }
        let well = self.finalize(assembled);
        self.store.upsert(&well)?;
        Ok(())
    }

    /// Applies post-assembly defaults. The portal never states a CRS, so a
    /// configured default fills the gap when the record has none.
    fn finalize(&self, assembled: Assembled) -> Well {
        let mut well = assembled.well;
        if well.crs.is_none() {
            well.crs = self.default_crs.clone();
        }
        well
    }

    /// The store, for post-run inspection.
    #[must_use]
    pub fn store(&self) -> &WellStore {
        &self.store
    }
}
