//! HTTP fetcher implementation
//!
//! This module handles page requests for the extractor:
//! - Building the shared HTTP client with a browser-like user agent
//! - Single-attempt GET requests with a bounded timeout
//! - Error classification into `FinsightError::Fetch`

use crate::config::HttpConfig;
use crate::extractor::RawDocument;
use crate::url::FetchTarget;
use crate::FinsightError;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// The client is shared by the permission gate and the page fetcher; request
/// timeouts are set per request, so only the connect timeout lives here.
///
/// # Example
///
/// ```no_run
/// use finsight::config::HttpConfig;
/// use finsight::extractor::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .connect_timeout(config.connect_timeout())
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page once, with no retry
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 2xx | `Ok(RawDocument)` |
/// | Other HTTP status | `Err(Fetch)` with the status |
/// | Timeout | `Err(Fetch)` "Request timeout" |
/// | Connection refused / DNS / TLS | `Err(Fetch)` "Connection failed" |
/// | Body read failure | `Err(Fetch)` |
pub async fn fetch_document(
    client: &Client,
    target: &FetchTarget,
    timeout: Duration,
) -> Result<RawDocument, FinsightError> {
    let url = target.as_str();

    let response = client
        .get(target.as_url().clone())
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| fetch_error(url, &e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FinsightError::Fetch {
            url: url.to_string(),
            cause: format!("HTTP {}", status),
        });
    }

    if response.url().as_str() != url {
        tracing::debug!("{} redirected to {}", url, response.url());
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if let Some(ct) = content_type.as_deref() {
        if !ct.contains("html") {
            tracing::debug!("{} has non-HTML content type '{}'", url, ct);
        }
    }

    let body = response.text().await.map_err(|e| fetch_error(url, &e))?;

    Ok(RawDocument {
        url: url.to_string(),
        status_code: status.as_u16(),
        body,
        content_type,
    })
}

/// Classifies a transport error into a fetch failure
fn fetch_error(url: &str, error: &reqwest::Error) -> FinsightError {
    let cause = if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else if error.is_redirect() {
        format!("Redirect error: {}", error)
    } else {
        error.to_string()
    };

    FinsightError::Fetch {
        url: url.to_string(),
        cause,
    }
}
