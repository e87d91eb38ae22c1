//! Web content extractor
//!
//! This module turns an arbitrary URL into clean body text:
//! - Permission check against the site's robots.txt
//! - HTTP fetch (or an optional renderer for script-heavy pages)
//! - Removal of structural chrome and noise-looking elements
//! - Main-content selection
//! - Text extraction and whitespace normalization

mod fetcher;
mod noise;
mod reducer;
mod render;
mod select;
mod text;

pub use fetcher::{build_http_client, fetch_document};
pub use noise::{prune_noise, NOISE_PATTERNS, NOISE_TAGS};
pub use reducer::{reduce_document, ContentReducer};
pub use render::{render_policy_from_config, HostListPolicy, RenderPolicy, Renderer, StaticOnly};
pub use select::{select_main_content, ContentSelection, CONTENT_SELECTORS};
pub use text::{extract_text, normalize_whitespace, truncate_lines};

use serde::Serialize;
use std::fmt;

/// A fetched page, owned by the reducer for the duration of one reduction
///
/// Also returned as is by [`ContentReducer::fetch_raw`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawDocument {
    /// The requested URL
    pub url: String,

    /// HTTP status code of the final response
    pub status_code: u16,

    /// Response body as text
    pub body: String,

    /// Content-Type header value, if any
    pub content_type: Option<String>,
}

/// Clean body text reduced from a page
///
/// This is the only artifact handed back to callers. It carries no reference
/// to the parsed document it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReducedText {
    /// The URL the text was reduced from
    pub source_url: String,

    /// Normalized lines; a single empty line separates paragraphs
    pub lines: Vec<String>,

    /// Whether the text was cut to the configured character limit
    pub truncated: bool,
}

impl ReducedText {
    /// Returns the text with lines joined by newlines
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Returns the number of characters in the joined text
    pub fn char_count(&self) -> usize {
        self.lines.iter().map(|l| l.chars().count()).sum::<usize>()
            + self.lines.len().saturating_sub(1)
    }
}

impl fmt::Display for ReducedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}
