//! Finsight: company research plumbing with a polite web content extractor
//!
//! This crate checks a site's robots.txt, fetches pages, and reduces raw
//! markup to readable body text. Around that core it composes company reports
//! from a pluggable market-data collaborator and an encyclopedia background
//! lookup, and routes caller roles through a capability table.

pub mod batch;
pub mod collaborators;
pub mod config;
pub mod extractor;
pub mod market;
pub mod output;
pub mod robots;
pub mod roles;
pub mod url;

use serde::Serialize;
use thiserror::Error;

/// Main error type for Finsight operations
///
/// Every variant is recoverable by the caller. Network and parsing failures
/// are converted into one of these at the component boundary.
#[derive(Debug, Error)]
pub enum FinsightError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("{message}")]
    PolicyBlocked { url: String, message: String },

    #[error("Failed to retrieve {url}: {cause}")]
    Fetch { url: String, cause: String },

    #[error("No main content found at {url}")]
    NoContent { url: String },

    #[error("Upstream service unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("Role '{role}' is not permitted to use '{capability}'")]
    CapabilityDenied {
        role: roles::Role,
        capability: roles::Capability,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl FinsightError {
    /// Returns the serializable tag for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::PolicyBlocked { .. } => ErrorKind::PolicyBlocked,
            Self::Fetch { .. } => ErrorKind::Fetch,
            Self::NoContent { .. } => ErrorKind::NoContent,
            Self::UpstreamUnavailable(_) => ErrorKind::UpstreamUnavailable,
            Self::SymbolNotFound(_) => ErrorKind::SymbolNotFound,
            Self::CapabilityDenied { .. } => ErrorKind::CapabilityDenied,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}

impl From<UrlError> for FinsightError {
    fn from(err: UrlError) -> Self {
        FinsightError::Validation(err.to_string())
    }
}

/// Stable tag describing which class of failure occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    PolicyBlocked,
    Fetch,
    NoContent,
    UpstreamUnavailable,
    SymbolNotFound,
    CapabilityDenied,
    Config,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid host pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL '{input}': {reason}")]
    Parse { input: String, reason: String },

    #[error("Invalid URL scheme '{0}', expected http or https")]
    InvalidScheme(String),

    #[error("Missing host in URL '{0}'")]
    MissingHost(String),
}

/// Result type alias for Finsight operations
pub type Result<T> = std::result::Result<T, FinsightError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use batch::{BatchCoordinator, BatchEntry, BatchResult};
pub use collaborators::Collaborators;
pub use config::Config;
pub use extractor::{ContentReducer, RawDocument, ReducedText};
pub use output::{ErrorRecord, Outcome};
pub use robots::{PermissionGate, PolicyDecision, PolicyReason};
pub use roles::{Capability, Dispatcher, Request, Response, Role, RoleTable};
pub use url::FetchTarget;
