//! Market-data collaborator boundary and company report composition
//!
//! Finsight ships no market-data provider. Callers plug one in through the
//! [`MarketData`] trait; without one, every market operation reports
//! `UpstreamUnavailable`.

mod background;
mod report;
mod types;

pub use background::{extract_key_facts, BackgroundLookup, CompanyBackground, PREVIEW_CHARS};
pub use report::{compose_report, CompanyReport, ReportStatus};
pub use types::{
    cap_news, normalize_symbol, CompanyProfile, FinancialMetrics, FinancialStatements,
    NewsArticle, Quote, MAX_NEWS_ARTICLES,
};

use crate::FinsightError;
use async_trait::async_trait;
use thiserror::Error;

/// Errors a market-data provider may report
///
/// "Symbol not found" is kept distinct from "service unavailable" so callers
/// can tell a bad ticker from an outage.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MarketError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("Market data unavailable: {0}")]
    Unavailable(String),
}

impl From<MarketError> for FinsightError {
    fn from(err: MarketError) -> Self {
        match err {
            MarketError::SymbolNotFound(symbol) => FinsightError::SymbolNotFound(symbol),
            MarketError::Unavailable(reason) => FinsightError::UpstreamUnavailable(reason),
        }
    }
}

/// A source of prices, company profiles, statements and news keyed by ticker symbol
///
/// Symbols are passed already normalized (trimmed, uppercase).
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Current price snapshot
    async fn quote(&self, symbol: &str) -> Result<Quote, MarketError>;

    /// Company profile fields
    async fn profile(&self, symbol: &str) -> Result<CompanyProfile, MarketError>;

    /// Latest annual statement figures
    async fn financials(&self, symbol: &str) -> Result<FinancialStatements, MarketError>;

    /// Recent news, in any order and of any length; callers cap it
    async fn news(&self, symbol: &str) -> Result<Vec<NewsArticle>, MarketError>;
}
