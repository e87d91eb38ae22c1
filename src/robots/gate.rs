//! robots.txt fetching and decision making

use crate::robots::{has_blanket_disallow, PolicyDecision, PolicyReason};
use crate::url::FetchTarget;
use crate::FinsightError;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Decides whether a URL may be fetched, based on its site's robots.txt
///
/// Each check performs exactly one GET against `/robots.txt`, bounded by
/// `timeout`. There are no retries and nothing is cached between checks.
#[derive(Debug, Clone)]
pub struct PermissionGate {
    client: Client,
    timeout: Duration,
}

impl PermissionGate {
    /// Creates a gate that issues policy requests through `client`
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Returns the per-request timeout used for robots.txt fetches
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Validates `url` and checks its policy
    ///
    /// # Returns
    ///
    /// * `Ok(PolicyDecision)` - The decision (fetch problems fail open)
    /// * `Err(FinsightError::Validation)` - The URL is malformed; no request was made
    pub async fn check_url(&self, url: &str) -> Result<PolicyDecision, FinsightError> {
        let target = FetchTarget::parse(url)?;
        Ok(self.check(&target).await)
    }

    /// Checks the robots.txt policy governing `target`
    ///
    /// | robots.txt response | allowed | reason |
    /// |---------------------|---------|--------|
    /// | 200, blanket `Disallow: /` | false | PathBlocked |
    /// | 200, anything else | true | PathAllowed |
    /// | 200, unreadable body | true | PolicyFetchFailed |
    /// | non-200, timeout, connection failure | true | NoPolicyFound |
    pub async fn check(&self, target: &FetchTarget) -> PolicyDecision {
        let policy_url = target.policy_url();
        tracing::debug!("Fetching robots.txt from {}", policy_url);

        let response = match self
            .client
            .get(policy_url.clone())
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                if e.is_timeout() {
                    tracing::debug!("robots.txt request to {} timed out", policy_url);
                } else {
                    tracing::debug!("robots.txt request to {} failed: {}", policy_url, e);
                }
                return PolicyDecision::new(target.as_str(), PolicyReason::NoPolicyFound);
            }
        };

        if response.status() != StatusCode::OK {
            tracing::debug!(
                "robots.txt at {} returned HTTP {}",
                policy_url,
                response.status().as_u16()
            );
            return PolicyDecision::new(target.as_str(), PolicyReason::NoPolicyFound);
        }

        let reason = match response.text().await {
            Ok(content) if has_blanket_disallow(&content) => PolicyReason::PathBlocked,
            Ok(_) => PolicyReason::PathAllowed,
            Err(e) => {
                tracing::warn!("Failed to read robots.txt body from {}: {}", policy_url, e);
                PolicyReason::PolicyFetchFailed
            }
        };

        if reason == PolicyReason::PathBlocked {
            tracing::info!("robots.txt at {} blocks the whole site", policy_url);
        }

        PolicyDecision::new(target.as_str(), reason)
    }
}
