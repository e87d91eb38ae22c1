//! Multi-URL reduction
//!
//! The batch coordinator applies the content reducer to a list of URLs and
//! reports one outcome per URL, in input order. A failing URL never stops the
//! rest of the batch.

mod coordinator;

pub use coordinator::BatchCoordinator;

use crate::extractor::ReducedText;
use crate::output::Outcome;
use serde::Serialize;

/// Result of reducing one URL in a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchEntry {
    /// The URL exactly as given by the caller
    pub url: String,

    /// Reduced text or the error that stopped this URL
    pub outcome: Outcome<ReducedText>,
}

/// Per-URL outcomes, one entry per input URL, in input order
///
/// Repeated input URLs produce repeated entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchResult {
    pub total_urls: usize,
    pub entries: Vec<BatchEntry>,
}

impl BatchResult {
    /// Builds a result from entries already in input order
    pub fn from_entries(entries: Vec<BatchEntry>) -> Self {
        Self {
            total_urls: entries.len(),
            entries,
        }
    }

    /// Returns the number of URLs that were reduced successfully
    pub fn succeeded(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.outcome.is_success())
            .count()
    }

    /// Returns the number of URLs that failed
    pub fn failed(&self) -> usize {
        self.total_urls - self.succeeded()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BatchEntry> {
        self.entries.iter()
    }
}
