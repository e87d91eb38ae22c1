use crate::roles::Capability;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Browser-like identification sent with page requests
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Main configuration structure for Finsight
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub extractor: ExtractorConfig,
    pub batch: BatchConfig,
    pub background: BackgroundConfig,

    /// Capability overrides keyed by role name (e.g. "future-outlook")
    pub roles: BTreeMap<String, Vec<Capability>>,
}

/// HTTP client behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Timeout for the robots.txt request (milliseconds)
    pub policy_timeout_ms: u64,

    /// Timeout for the page request (milliseconds)
    pub fetch_timeout_ms: u64,

    /// TCP connect timeout (milliseconds)
    pub connect_timeout_ms: u64,

    /// Maximum redirects followed for one request
    pub max_redirects: usize,
}

impl HttpConfig {
    pub fn policy_timeout(&self) -> Duration {
        Duration::from_millis(self.policy_timeout_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            policy_timeout_ms: 5_000,
            fetch_timeout_ms: 15_000,
            connect_timeout_ms: 5_000,
            max_redirects: 10,
        }
    }
}

/// Content reduction behavior
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ExtractorConfig {
    /// Cap on the characters of reduced text returned (unbounded when absent)
    pub max_text_chars: Option<usize>,

    /// Host patterns ("example.com", "*.example.com") whose pages need a
    /// JavaScript renderer. Only used when a renderer is supplied.
    pub dynamic_render_hosts: Vec<String>,
}

/// Multi-URL reduction behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BatchConfig {
    /// Number of URLs reduced at once; 1 means strictly sequential
    pub max_concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { max_concurrency: 1 }
    }
}

/// Encyclopedia background lookup
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BackgroundConfig {
    /// Base URL that article titles are appended to; must end with '/'
    pub wiki_base_url: String,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            wiki_base_url: "https://en.wikipedia.org/wiki/".to_string(),
        }
    }
}
