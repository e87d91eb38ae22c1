use crate::FinsightError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of news articles kept per symbol
pub const MAX_NEWS_ARTICLES: usize = 10;

/// Current price snapshot for a symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub company_name: Option<String>,
    pub currency: String,
    pub price: f64,
    pub previous_close: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: u64,
    pub market_cap: Option<u64>,
}

impl Quote {
    /// Builds a quote, deriving the daily change from the two prices
    ///
    /// When the previous close is zero the percentage change is reported as 0.
    pub fn from_prices(symbol: &str, price: f64, previous_close: f64) -> Self {
        let change = price - previous_close;
        let change_percent = if previous_close != 0.0 {
            change / previous_close * 100.0
        } else {
            0.0
        };

        Self {
            symbol: symbol.to_string(),
            company_name: None,
            currency: "USD".to_string(),
            price,
            previous_close,
            change,
            change_percent,
            volume: 0,
            market_cap: None,
        }
    }
}

/// Descriptive company information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub symbol: String,
    pub company_name: String,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub employees: Option<u64>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    /// First listed company officer (usually the CEO)
    pub officer: Option<String>,
}

impl CompanyProfile {
    /// Joins the known location parts, e.g. "Cupertino, CA, United States"
    pub fn location(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.city, &self.state, &self.country]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .filter(|p| !p.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// Latest annual statement figures as reported by a provider
///
/// A figure the provider does not have is `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatements {
    pub revenue: Option<f64>,
    pub net_income: Option<f64>,
    pub total_assets: Option<f64>,
    pub total_liabilities: Option<f64>,
}

/// Statement figures plus the return ratios derived from them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialMetrics {
    pub symbol: String,
    pub revenue: Option<f64>,
    pub net_income: Option<f64>,
    pub total_assets: Option<f64>,
    pub total_liabilities: Option<f64>,

    /// Net income over equity (assets minus liabilities), in percent
    pub return_on_equity: Option<f64>,

    /// Net income over total assets, in percent
    pub return_on_assets: Option<f64>,
}

impl FinancialMetrics {
    /// Derives the return ratios from `statements`
    ///
    /// Return on equity is only computed when equity is positive, return on
    /// assets only when total assets are positive. Both need net income.
    pub fn from_statements(symbol: &str, statements: &FinancialStatements) -> Self {
        let assets = statements.total_assets.unwrap_or(0.0);
        let liabilities = statements.total_liabilities.unwrap_or(0.0);
        let equity = assets - liabilities;

        let return_on_equity = statements
            .net_income
            .filter(|_| equity > 0.0)
            .map(|income| income / equity * 100.0);
        let return_on_assets = statements
            .net_income
            .filter(|_| assets > 0.0)
            .map(|income| income / assets * 100.0);

        Self {
            symbol: symbol.to_string(),
            revenue: statements.revenue,
            net_income: statements.net_income,
            total_assets: statements.total_assets,
            total_liabilities: statements.total_liabilities,
            return_on_equity,
            return_on_assets,
        }
    }
}

/// A news item about a company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub link: String,
}

/// Orders news most-recent-first and keeps at most [`MAX_NEWS_ARTICLES`]
///
/// Articles without a timestamp sort after dated ones, keeping their
/// relative order.
pub fn cap_news(mut articles: Vec<NewsArticle>) -> Vec<NewsArticle> {
    articles.sort_by(|a, b| b.published.cmp(&a.published));
    articles.truncate(MAX_NEWS_ARTICLES);
    articles
}

/// Normalizes a ticker symbol to trimmed uppercase
///
/// # Returns
///
/// * `Ok(String)` - e.g. " brk.b " becomes "BRK.B"
/// * `Err(FinsightError::Validation)` - Empty, too long, or containing
///   characters other than letters, digits, '.', '-', '^', '='
pub fn normalize_symbol(symbol: &str) -> Result<String, FinsightError> {
    let trimmed = symbol.trim();

    if trimmed.is_empty() {
        return Err(FinsightError::Validation(
            "Ticker symbol cannot be empty".to_string(),
        ));
    }

    if trimmed.len() > 15 {
        return Err(FinsightError::Validation(format!(
            "Ticker symbol '{}' is too long",
            trimmed
        )));
    }

    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='))
    {
        return Err(FinsightError::Validation(format!(
            "Ticker symbol '{}' contains invalid characters",
            trimmed
        )));
    }

    Ok(trimmed.to_ascii_uppercase())
}
