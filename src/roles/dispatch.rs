//! Capability-checked request routing

use crate::batch::{BatchCoordinator, BatchResult};
use crate::collaborators::Collaborators;
use crate::config::Config;
use crate::extractor::{ContentReducer, RawDocument, ReducedText};
use crate::market::{
    cap_news, compose_report, normalize_symbol, BackgroundLookup, CompanyBackground,
    CompanyProfile, CompanyReport, FinancialMetrics, NewsArticle, Quote,
};
use crate::output::Outcome;
use crate::robots::PolicyDecision;
use crate::roles::{Capability, Role, RoleTable};
use crate::FinsightError;
use serde::Serialize;
use std::sync::Arc;
use url::Url;

/// A single operation requested by a caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    CheckPolicy { url: String },
    FetchRaw { url: String },
    ReduceContent { url: String },
    ReduceBatch { urls: Vec<String> },
    Quote { symbol: String },
    CompanyProfile { symbol: String },
    FinancialMetrics { symbol: String },
    CompanyNews { symbol: String },
    CompanyBackground { company_name: String },
    CompanyReport { symbol: String },
}

impl Request {
    /// The capability a role must hold to issue this request
    pub fn capability(&self) -> Capability {
        match self {
            Request::CheckPolicy { .. } => Capability::CheckPolicy,
            Request::FetchRaw { .. } => Capability::FetchRaw,
            Request::ReduceContent { .. } => Capability::ReduceContent,
            Request::ReduceBatch { .. } => Capability::ReduceBatch,
            Request::Quote { .. } => Capability::Quote,
            Request::CompanyProfile { .. } => Capability::CompanyProfile,
            Request::FinancialMetrics { .. } => Capability::FinancialMetrics,
            Request::CompanyNews { .. } => Capability::CompanyNews,
            Request::CompanyBackground { .. } => Capability::CompanyBackground,
            Request::CompanyReport { .. } => Capability::CompanyReport,
        }
    }
}

/// The result payload of a successful request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Policy(PolicyDecision),
    Raw(RawDocument),
    Content(ReducedText),
    Batch(BatchResult),
    Quote(Quote),
    Profile(CompanyProfile),
    Financials(FinancialMetrics),
    News(Vec<NewsArticle>),
    Background(CompanyBackground),
    Report(Box<CompanyReport>),
}

/// Routes requests to the components that serve them, after checking the
/// caller's role against the role table
pub struct Dispatcher {
    table: RoleTable,
    reducer: Arc<ContentReducer>,
    batch: BatchCoordinator,
    background: BackgroundLookup,
    collaborators: Collaborators,
}

impl Dispatcher {
    /// Builds every component from `config` and the given collaborators
    pub fn new(config: &Config, collaborators: Collaborators) -> Result<Self, FinsightError> {
        let table = RoleTable::from_config(&config.roles)?;
        let reducer = Arc::new(ContentReducer::new(config, collaborators.renderer())?);
        let batch = BatchCoordinator::new(Arc::clone(&reducer), config.batch.max_concurrency);

        let base_url = Url::parse(&config.background.wiki_base_url).map_err(|e| {
            FinsightError::Validation(format!(
                "Invalid wiki base URL '{}': {}",
                config.background.wiki_base_url, e
            ))
        })?;
        let background = BackgroundLookup::new(Arc::clone(&reducer), base_url);

        Ok(Self {
            table,
            reducer,
            batch,
            background,
            collaborators,
        })
    }

    pub fn role_table(&self) -> &RoleTable {
        &self.table
    }

    pub fn reducer(&self) -> &ContentReducer {
        &self.reducer
    }

    /// Executes `request` on behalf of `role`
    ///
    /// # Returns
    ///
    /// * `Ok(Response)` - The component's result
    /// * `Err(FinsightError::CapabilityDenied)` - The role lacks the capability; nothing ran
    /// * `Err(FinsightError)` - The component's own failure
    pub async fn execute(&self, role: Role, request: Request) -> Result<Response, FinsightError> {
        let capability = request.capability();
        if !self.table.permits(role, capability) {
            tracing::info!("Role {} denied capability {}", role, capability);
            return Err(FinsightError::CapabilityDenied { role, capability });
        }

        tracing::debug!("Role {} executing {}", role, capability);

        match request {
            Request::CheckPolicy { url } => {
                Ok(Response::Policy(self.reducer.check_policy(&url).await?))
            }
            Request::FetchRaw { url } => Ok(Response::Raw(self.reducer.fetch_raw(&url).await?)),
            Request::ReduceContent { url } => {
                Ok(Response::Content(self.reducer.reduce(&url).await?))
            }
            Request::ReduceBatch { urls } => {
                Ok(Response::Batch(self.batch.reduce_all(&urls).await?))
            }
            Request::Quote { symbol } => {
                let symbol = normalize_symbol(&symbol)?;
                let quote = self.collaborators.market_data()?.quote(&symbol).await?;
                Ok(Response::Quote(quote))
            }
            Request::CompanyProfile { symbol } => {
                let symbol = normalize_symbol(&symbol)?;
                let profile = self.collaborators.market_data()?.profile(&symbol).await?;
                Ok(Response::Profile(profile))
            }
            Request::FinancialMetrics { symbol } => {
                let symbol = normalize_symbol(&symbol)?;
                let statements = self.collaborators.market_data()?.financials(&symbol).await?;
                Ok(Response::Financials(FinancialMetrics::from_statements(
                    &symbol,
                    &statements,
                )))
            }
            Request::CompanyNews { symbol } => {
                let symbol = normalize_symbol(&symbol)?;
                let news = self.collaborators.market_data()?.news(&symbol).await?;
                Ok(Response::News(cap_news(news)))
            }
            Request::CompanyBackground { company_name } => Ok(Response::Background(
                self.background.lookup(&company_name).await?,
            )),
            Request::CompanyReport { symbol } => {
                let market = self.collaborators.market_data().ok();
                let report = compose_report(&symbol, market, &self.background).await?;
                Ok(Response::Report(Box::new(report)))
            }
        }
    }

    /// Executes `request` and folds the result into a tagged [`Outcome`]
    pub async fn dispatch(&self, role: Role, request: Request) -> Outcome<Response> {
        self.execute(role, request).await.into()
    }
}
