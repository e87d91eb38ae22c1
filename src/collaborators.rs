//! External collaborators handed to the dispatcher at construction time

use crate::extractor::Renderer;
use crate::market::MarketData;
use crate::FinsightError;
use std::fmt;
use std::sync::Arc;

/// Optional providers the core cannot build on its own
///
/// Both are absent by default. Market operations without a provider report
/// `UpstreamUnavailable`; pages selected for dynamic rendering fall back to a
/// static fetch when no renderer is present.
#[derive(Clone, Default)]
pub struct Collaborators {
    market_data: Option<Arc<dyn MarketData>>,
    renderer: Option<Arc<dyn Renderer>>,
}

impl Collaborators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_market_data(mut self, provider: Arc<dyn MarketData>) -> Self {
        self.market_data = Some(provider);
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Returns the market-data provider or `UpstreamUnavailable`
    pub fn market_data(&self) -> Result<&dyn MarketData, FinsightError> {
        self.market_data.as_deref().ok_or_else(|| {
            FinsightError::UpstreamUnavailable("no market-data provider configured".to_string())
        })
    }

    pub fn has_market_data(&self) -> bool {
        self.market_data.is_some()
    }

    pub fn renderer(&self) -> Option<Arc<dyn Renderer>> {
        self.renderer.clone()
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators")
            .field("market_data", &self.market_data.is_some())
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}
