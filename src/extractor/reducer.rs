//! Content reduction pipeline
//!
//! One reduction walks a fixed sequence of stages and stops at the first
//! failure:
//!
//! ```text
//! POLICY_CHECK -> BLOCKED
//!              -> FETCH -> FETCH_FAILED
//!                       -> PARSE -> PRUNE -> SELECT -> NO_CONTENT
//!                                                   -> EXTRACT -> DONE
//! ```
//!
//! There are no retries and no partial results.

use crate::config::Config;
use crate::extractor::noise::prune_noise;
use crate::extractor::render::{render_policy_from_config, RenderPolicy, Renderer};
use crate::extractor::select::select_main_content;
use crate::extractor::text::{extract_text, normalize_whitespace, truncate_lines};
use crate::extractor::{build_http_client, fetch_document, RawDocument, ReducedText};
use crate::robots::{PermissionGate, PolicyDecision};
use crate::url::FetchTarget;
use crate::FinsightError;
use reqwest::Client;
use scraper::Html;
use std::sync::Arc;
use std::time::Duration;

/// Fetches pages and reduces them to clean body text
///
/// The reducer holds only immutable configuration and a connection pool;
/// every call re-checks robots.txt and re-fetches the page.
pub struct ContentReducer {
    client: Client,
    gate: PermissionGate,
    fetch_timeout: Duration,
    max_text_chars: Option<usize>,
    render_policy: Box<dyn RenderPolicy>,
    renderer: Option<Arc<dyn Renderer>>,
}

impl ContentReducer {
    /// Creates a reducer with its own HTTP client
    ///
    /// # Arguments
    ///
    /// * `config` - Finsight configuration (HTTP and extractor sections are used)
    /// * `renderer` - Optional JavaScript renderer for hosts the render policy selects
    pub fn new(
        config: &Config,
        renderer: Option<Arc<dyn Renderer>>,
    ) -> Result<Self, FinsightError> {
        let client = build_http_client(&config.http).map_err(|e| {
            FinsightError::UpstreamUnavailable(format!("HTTP client could not be built: {}", e))
        })?;
        Ok(Self::with_client(client, config, renderer))
    }

    /// Creates a reducer around an existing HTTP client
    pub fn with_client(
        client: Client,
        config: &Config,
        renderer: Option<Arc<dyn Renderer>>,
    ) -> Self {
        let gate = PermissionGate::new(client.clone(), config.http.policy_timeout());
        Self {
            client,
            gate,
            fetch_timeout: config.http.fetch_timeout(),
            max_text_chars: config.extractor.max_text_chars,
            render_policy: render_policy_from_config(&config.extractor),
            renderer,
        }
    }

    /// Replaces the render policy
    pub fn with_render_policy(mut self, policy: Box<dyn RenderPolicy>) -> Self {
        self.render_policy = policy;
        self
    }

    /// Returns the permission gate used before every fetch
    pub fn gate(&self) -> &PermissionGate {
        &self.gate
    }

    /// Checks robots.txt for `url` without fetching the page
    pub async fn check_policy(&self, url: &str) -> Result<PolicyDecision, FinsightError> {
        self.gate.check_url(url).await
    }

    /// Reduces the page at `url` to clean text
    ///
    /// # Returns
    ///
    /// * `Ok(ReducedText)` - Normalized body text
    /// * `Err(Validation)` - The URL is malformed; nothing was fetched
    /// * `Err(PolicyBlocked)` - robots.txt blocks the site; the page was not fetched
    /// * `Err(Fetch)` - Non-2xx status, timeout, or connection failure
    /// * `Err(NoContent)` - The page had no extractable body text
    pub async fn reduce(&self, url: &str) -> Result<ReducedText, FinsightError> {
        let target = self.permitted_target(url).await?;

        let raw = self.retrieve(&target).await?;
        tracing::debug!(
            "Fetched {} (HTTP {}, {} bytes)",
            raw.url,
            raw.status_code,
            raw.body.len()
        );

        let reduced = reduce_document(&raw, self.max_text_chars)?;
        tracing::info!(
            "Reduced {} to {} lines{}",
            reduced.source_url,
            reduced.lines.len(),
            if reduced.truncated { " (truncated)" } else { "" }
        );
        Ok(reduced)
    }

    /// Fetches the page at `url` without reducing it
    ///
    /// The robots.txt check still applies. The markup is what the server sent;
    /// the render policy is not consulted.
    ///
    /// # Returns
    ///
    /// * `Ok(RawDocument)` - Status code, content type and unprocessed body
    /// * `Err(Validation | PolicyBlocked | Fetch)` - As for [`ContentReducer::reduce`]
    pub async fn fetch_raw(&self, url: &str) -> Result<RawDocument, FinsightError> {
        let target = self.permitted_target(url).await?;
        let raw = fetch_document(&self.client, &target, self.fetch_timeout).await?;
        tracing::info!("Fetched raw markup of {} ({} bytes)", raw.url, raw.body.len());
        Ok(raw)
    }

    async fn permitted_target(&self, url: &str) -> Result<FetchTarget, FinsightError> {
        let target = FetchTarget::parse(url)?;

        let decision = self.gate.check(&target).await;
        if !decision.allowed {
            tracing::info!("Skipping {}: {}", target, decision.message);
            return Err(FinsightError::PolicyBlocked {
                url: target.to_string(),
                message: decision.message,
            });
        }

        Ok(target)
    }

    async fn retrieve(&self, target: &FetchTarget) -> Result<RawDocument, FinsightError> {
        if self.render_policy.needs_dynamic_rendering(target) {
            match &self.renderer {
                Some(renderer) => {
                    tracing::debug!("Rendering {} with the configured renderer", target);
                    return renderer.render(target).await;
                }
                None => {
                    tracing::warn!(
                        "{} needs dynamic rendering but no renderer is configured, using static fetch",
                        target
                    );
                }
            }
        }

        fetch_document(&self.client, target, self.fetch_timeout).await
    }
}

/// Reduces an already-fetched document to clean text
///
/// Parses the body, prunes noise, selects the main content, and normalizes
/// its text. An empty result is reported as `NoContent`, never as empty text.
pub fn reduce_document(
    raw: &RawDocument,
    max_text_chars: Option<usize>,
) -> Result<ReducedText, FinsightError> {
    let mut document = Html::parse_document(&raw.body);
    prune_noise(&mut document);

    let no_content = || FinsightError::NoContent {
        url: raw.url.clone(),
    };

    let selection = select_main_content(&document).ok_or_else(no_content)?;
    tracing::debug!(
        "Selected main content of {} via '{}'",
        raw.url,
        selection.selector
    );

    let lines = normalize_whitespace(&extract_text(selection.element));
    if lines.is_empty() {
        return Err(no_content());
    }

    let (lines, truncated) = match max_text_chars {
        Some(limit) => truncate_lines(lines, limit),
        None => (lines, false),
    };

    Ok(ReducedText {
        source_url: raw.url.clone(),
        lines,
        truncated,
    })
}
