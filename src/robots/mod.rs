//! Robots.txt permission gate
//!
//! This module fetches a site's robots.txt and turns it into a coarse,
//! whole-site allow/deny decision. The gate is fail-open: a missing or
//! unreachable policy file counts as permission.
//!
//! The check is deliberately not a conformant robots.txt evaluator. It does
//! not look at user-agent groups, per-path `Allow`/`Disallow` precedence,
//! wildcards, or crawl-delay. A site is blocked only when it carries a blanket
//! `Disallow: /` line anywhere in the file.

mod gate;
mod parser;

pub use gate::PermissionGate;
pub use parser::has_blanket_disallow;

use serde::Serialize;

/// Why a policy decision came out the way it did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyReason {
    /// No robots.txt (non-200, timeout, or connection failure)
    NoPolicyFound,
    /// robots.txt answered 200 but its body could not be read
    PolicyFetchFailed,
    /// robots.txt carries a blanket disallow-root rule
    PathBlocked,
    /// robots.txt was read and does not block the whole site
    PathAllowed,
}

impl PolicyReason {
    /// Returns whether this reason grants permission to fetch
    pub fn is_allowed(&self) -> bool {
        !matches!(self, Self::PathBlocked)
    }
}

/// Outcome of a robots.txt check
///
/// Computed fresh for every request and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyDecision {
    /// Whether fetching the URL is permitted
    pub allowed: bool,

    /// Why the decision was made
    pub reason: PolicyReason,

    /// Human-readable message embedding the checked URL
    pub message: String,
}

impl PolicyDecision {
    /// Builds a decision for `url` with the standard message for `reason`
    pub fn new(url: &str, reason: PolicyReason) -> Self {
        let message = match reason {
            PolicyReason::NoPolicyFound => {
                format!("No robots.txt found for {url}, assuming fetching is allowed")
            }
            PolicyReason::PolicyFetchFailed => format!(
                "robots.txt for {url} could not be read, assuming fetching is allowed"
            ),
            PolicyReason::PathBlocked => format!("Fetching {url} is disallowed by robots.txt"),
            PolicyReason::PathAllowed => {
                format!("Fetching {url} appears to be allowed by robots.txt")
            }
        };

        Self {
            allowed: reason.is_allowed(),
            reason,
            message,
        }
    }
}
