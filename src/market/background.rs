//! Encyclopedia background lookup

use crate::extractor::ContentReducer;
use crate::FinsightError;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use url::Url;

/// Number of characters kept in a background preview
pub const PREVIEW_CHARS: usize = 500;

/// Narrative company background reduced from an encyclopedia article
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyBackground {
    pub company_name: String,
    pub source: String,
    pub source_url: String,

    /// The first [`PREVIEW_CHARS`] characters, with "..." appended when cut
    pub preview: String,

    /// `founded`, `headquarters` and `ceo`, where found
    pub key_facts: BTreeMap<String, String>,
}

/// Looks up company background through the content reducer
///
/// The article URL is `{base}{Name_With_Underscores}`. When that page cannot
/// be fetched or has no content, the lookup retries once against the wiki's
/// search page.
#[derive(Clone)]
pub struct BackgroundLookup {
    reducer: Arc<ContentReducer>,
    base_url: Url,
}

impl BackgroundLookup {
    pub fn new(reducer: Arc<ContentReducer>, base_url: Url) -> Self {
        Self { reducer, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetches background for `company_name`
    ///
    /// # Returns
    ///
    /// * `Ok(CompanyBackground)` - Preview and key facts
    /// * `Err(FinsightError::Validation)` - The name is empty
    /// * `Err(FinsightError)` - Neither the article nor the search page could be reduced
    pub async fn lookup(&self, company_name: &str) -> Result<CompanyBackground, FinsightError> {
        let name = company_name.trim();
        if name.is_empty() {
            return Err(FinsightError::Validation(
                "Company name cannot be empty".to_string(),
            ));
        }

        let slug = name.split_whitespace().collect::<Vec<_>>().join("_");
        let article_url = self.join(&slug)?;

        let (source_url, reduced) = match self.reducer.reduce(article_url.as_str()).await {
            Ok(reduced) => (article_url, reduced),
            Err(e @ (FinsightError::Fetch { .. } | FinsightError::NoContent { .. })) => {
                tracing::debug!("Article lookup for '{}' failed ({}), trying search", name, e);
                let search_url = self.join(&format!("Special:Search/{}", slug))?;
                let reduced = self.reducer.reduce(search_url.as_str()).await?;
                (search_url, reduced)
            }
            Err(e) => return Err(e),
        };

        let text = reduced.text();
        Ok(CompanyBackground {
            company_name: name.to_string(),
            source: self.source_name(),
            source_url: source_url.to_string(),
            preview: preview(&text),
            key_facts: extract_key_facts(&text),
        })
    }

    // Concatenated rather than `Url::join`, which reads "Special:" as a scheme
    fn join(&self, path: &str) -> Result<Url, FinsightError> {
        Url::parse(&format!("{}{}", self.base_url, path)).map_err(|e| {
            FinsightError::Validation(format!("Cannot build background URL for '{}': {}", path, e))
        })
    }

    fn source_name(&self) -> String {
        match self.base_url.host_str() {
            Some(host) if host.ends_with("wikipedia.org") => "Wikipedia".to_string(),
            Some(host) => host.to_string(),
            None => "unknown".to_string(),
        }
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(PREVIEW_CHARS).collect();
    cut.push_str("...");
    cut
}

/// Finds founding year, headquarters and CEO sentences in article text
///
/// Matching runs on the lowercased text, so fact values are lowercase. The
/// keyword itself and surrounding spaces and periods are dropped from the
/// headquarters and CEO values.
pub fn extract_key_facts(text: &str) -> BTreeMap<String, String> {
    let lower = text.to_lowercase();
    let mut facts = BTreeMap::new();

    if let Ok(re) = Regex::new(r"founded[^0-9]*(\d{4})") {
        if let Some(caps) = re.captures(&lower) {
            facts.insert("founded".to_string(), caps[1].to_string());
        }
    }

    for (key, pattern) in [
        ("headquarters", r"headquarters[^.]*\."),
        ("ceo", r"\bceo\b[^.]*\."),
    ] {
        if let Ok(re) = Regex::new(pattern) {
            if let Some(m) = re.find(&lower) {
                let value = m
                    .as_str()
                    .replacen(key, "", 1)
                    .trim_matches(|c| c == ' ' || c == '.')
                    .to_string();
                if !value.is_empty() {
                    facts.insert(key.to_string(), value);
                }
            }
        }
    }

    facts
}
