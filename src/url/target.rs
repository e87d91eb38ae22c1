use crate::UrlError;
use std::fmt;
use url::Url;

/// A validated, absolute HTTP(S) URL that may be fetched
///
/// Construction is the only validation point: relative, malformed, or
/// non-HTTP URLs are rejected here, before any network activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTarget {
    url: Url,
}

impl FetchTarget {
    /// Parses and validates a fetch target
    ///
    /// # Arguments
    ///
    /// * `input` - The URL string; surrounding whitespace is ignored
    ///
    /// # Returns
    ///
    /// * `Ok(FetchTarget)` - The URL has an http(s) scheme and a host
    /// * `Err(UrlError)` - The URL is empty, relative, malformed, or unsupported
    ///
    /// # Examples
    ///
    /// ```
    /// use finsight::url::FetchTarget;
    ///
    /// let target = FetchTarget::parse("https://example.com/news?id=7").unwrap();
    /// assert_eq!(target.host(), "example.com");
    /// assert!(FetchTarget::parse("/relative/path").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, UrlError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(UrlError::Parse {
                input: input.to_string(),
                reason: "empty URL".to_string(),
            });
        }

        let url = Url::parse(trimmed).map_err(|e| UrlError::Parse {
            input: trimmed.to_string(),
            reason: e.to_string(),
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(url.scheme().to_string()));
        }

        match url.host_str() {
            Some(host) if !host.is_empty() => Ok(Self { url }),
            _ => Err(UrlError::MissingHost(trimmed.to_string())),
        }
    }

    /// Returns the underlying URL
    pub fn as_url(&self) -> &Url {
        &self.url
    }

    /// Returns the URL as a string slice
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Returns the (lowercase) host of the URL
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Derives the robots.txt location: `{scheme}://{authority}/robots.txt`
    ///
    /// Path, query, and fragment of the target are discarded.
    pub fn policy_url(&self) -> Url {
        let mut policy = self.url.clone();
        policy.set_path("/robots.txt");
        policy.set_query(None);
        policy.set_fragment(None);
        policy
    }
}

impl fmt::Display for FetchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}
