//! Company report composition

use crate::market::background::{BackgroundLookup, CompanyBackground};
use crate::market::types::{
    cap_news, normalize_symbol, CompanyProfile, FinancialMetrics, NewsArticle, Quote,
};
use crate::market::MarketData;
use crate::output::{ErrorRecord, Outcome};
use crate::FinsightError;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Overall state of a composed report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Every section succeeded
    Complete,
    /// The quote or the profile succeeded, something else failed
    Partial,
    /// Neither the quote nor the profile succeeded
    Failed,
}

/// Aggregated company data, one outcome per section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyReport {
    pub symbol: String,
    pub generated_at: DateTime<Utc>,
    pub status: ReportStatus,
    pub quote: Outcome<Quote>,
    pub profile: Outcome<CompanyProfile>,
    pub financials: Outcome<FinancialMetrics>,
    pub news: Outcome<Vec<NewsArticle>>,
    pub background: Outcome<CompanyBackground>,
}

impl CompanyReport {
    /// Names and errors of the sections that failed, in report order
    pub fn failed_sections(&self) -> Vec<(&'static str, &ErrorRecord)> {
        [
            ("quote", self.quote.error()),
            ("profile", self.profile.error()),
            ("financials", self.financials.error()),
            ("news", self.news.error()),
            ("background", self.background.error()),
        ]
        .into_iter()
        .filter_map(|(section, error)| error.map(|e| (section, e)))
        .collect()
    }

    fn status_of(&self) -> ReportStatus {
        if self.failed_sections().is_empty() {
            ReportStatus::Complete
        } else if self.quote.is_success() || self.profile.is_success() {
            ReportStatus::Partial
        } else {
            ReportStatus::Failed
        }
    }
}

/// Composes a company report from market data and background lookup
///
/// Sections run in order: quote, profile, financials, news, background. A
/// failing section is recorded in the report and never stops the others.
/// Background is looked up by the profile's company name when the profile
/// succeeded, otherwise by the symbol.
///
/// # Returns
///
/// * `Ok(CompanyReport)` - Always, once the symbol is valid
/// * `Err(FinsightError::Validation)` - The symbol is empty or malformed
pub async fn compose_report(
    symbol: &str,
    market: Option<&dyn MarketData>,
    background: &BackgroundLookup,
) -> Result<CompanyReport, FinsightError> {
    let symbol = normalize_symbol(symbol)?;
    tracing::info!("Composing company report for {}", symbol);

    let (quote, profile, financials, news) = match market {
        Some(market) => {
            let quote: Outcome<Quote> = market
                .quote(&symbol)
                .await
                .map_err(FinsightError::from)
                .into();
            let profile: Outcome<CompanyProfile> = market
                .profile(&symbol)
                .await
                .map_err(FinsightError::from)
                .into();
            let financials: Outcome<FinancialMetrics> = market
                .financials(&symbol)
                .await
                .map(|statements| FinancialMetrics::from_statements(&symbol, &statements))
                .map_err(FinsightError::from)
                .into();
            let news: Outcome<Vec<NewsArticle>> = market
                .news(&symbol)
                .await
                .map(cap_news)
                .map_err(FinsightError::from)
                .into();
            (quote, profile, financials, news)
        }
        None => {
            let missing = FinsightError::UpstreamUnavailable(
                "no market-data provider configured".to_string(),
            );
            (
                Outcome::failure(&missing),
                Outcome::failure(&missing),
                Outcome::failure(&missing),
                Outcome::failure(&missing),
            )
        }
    };

    let lookup_name = profile
        .data()
        .map(|p| p.company_name.clone())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| symbol.clone());
    let background: Outcome<CompanyBackground> = background.lookup(&lookup_name).await.into();

    let mut report = CompanyReport {
        symbol,
        generated_at: Utc::now(),
        status: ReportStatus::Failed,
        quote,
        profile,
        financials,
        news,
        background,
    };

    for (section, err) in report.failed_sections() {
        tracing::warn!("{} section for {} failed: {}", section, report.symbol, err.message);
    }

    report.status = report.status_of();
    Ok(report)
}
