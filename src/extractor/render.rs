//! Pluggable dynamic-rendering seam
//!
//! Pages that only produce their content through JavaScript need a renderer
//! (for example a headless browser). Whether a URL needs one is decided by a
//! [`RenderPolicy`]; the renderer itself is an optional [`Renderer`]
//! collaborator supplied at construction time. Without a renderer every page
//! goes through the plain HTTP fetch.

use crate::config::ExtractorConfig;
use crate::extractor::RawDocument;
use crate::url::{matches_host_pattern, FetchTarget};
use crate::FinsightError;
use async_trait::async_trait;

/// Decides whether a URL must be rendered with JavaScript
pub trait RenderPolicy: Send + Sync {
    fn needs_dynamic_rendering(&self, target: &FetchTarget) -> bool;
}

/// Never asks for rendering
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticOnly;

impl RenderPolicy for StaticOnly {
    fn needs_dynamic_rendering(&self, _target: &FetchTarget) -> bool {
        false
    }
}

/// Asks for rendering when the target host matches a configured pattern
#[derive(Debug, Clone, Default)]
pub struct HostListPolicy {
    patterns: Vec<String>,
}

impl HostListPolicy {
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }
}

impl RenderPolicy for HostListPolicy {
    fn needs_dynamic_rendering(&self, target: &FetchTarget) -> bool {
        self.patterns
            .iter()
            .any(|pattern| matches_host_pattern(pattern, target.host()))
    }
}

/// Produces the rendered markup of a page
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, target: &FetchTarget) -> Result<RawDocument, FinsightError>;
}

/// Builds the render policy described by the extractor configuration
pub fn render_policy_from_config(config: &ExtractorConfig) -> Box<dyn RenderPolicy> {
    if config.dynamic_render_hosts.is_empty() {
        Box::new(StaticOnly)
    } else {
        Box::new(HostListPolicy::new(config.dynamic_render_hosts.clone()))
    }
}
