//! Batch coordinator - ordered multi-URL reduction

use crate::batch::{BatchEntry, BatchResult};
use crate::extractor::ContentReducer;
use crate::output::Outcome;
use crate::FinsightError;
use futures::stream::{self, StreamExt};
use std::sync::Arc;

/// Reduces many URLs with partial-failure semantics
///
/// With the default concurrency of 1 URLs are processed strictly one after
/// another. Higher concurrency overlaps the network waits of up to that many
/// URLs; entries are still reported by input index, not completion order.
pub struct BatchCoordinator {
    reducer: Arc<ContentReducer>,
    max_concurrency: usize,
}

impl BatchCoordinator {
    /// Creates a coordinator around a shared reducer
    pub fn new(reducer: Arc<ContentReducer>, max_concurrency: usize) -> Self {
        Self {
            reducer,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Returns the number of URLs reduced at once
    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Reduces every URL in `urls`
    ///
    /// # Returns
    ///
    /// * `Ok(BatchResult)` - One entry per URL, in input order
    /// * `Err(FinsightError::Validation)` - `urls` is empty; nothing was fetched
    pub async fn reduce_all(&self, urls: &[String]) -> Result<BatchResult, FinsightError> {
        if urls.is_empty() {
            return Err(FinsightError::Validation("No URLs provided".to_string()));
        }

        tracing::info!(
            "Reducing {} URLs (concurrency {})",
            urls.len(),
            self.max_concurrency
        );

        let entries: Vec<BatchEntry> = stream::iter(urls.iter().enumerate())
            .map(|(index, url)| async move {
                let outcome = match self.reducer.reduce(url).await {
                    Ok(text) => Outcome::success(text),
                    Err(e) => {
                        tracing::warn!("Batch item {} ({}) failed: {}", index + 1, url, e);
                        Outcome::failure(&e)
                    }
                };
                BatchEntry {
                    url: url.clone(),
                    outcome,
                }
            })
            .buffered(self.max_concurrency)
            .collect()
            .await;

        let result = BatchResult::from_entries(entries);
        tracing::info!(
            "Batch finished: {} succeeded, {} failed",
            result.succeeded(),
            result.failed()
        );
        Ok(result)
    }
}
