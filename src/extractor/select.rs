//! Main-content selection

use scraper::{ElementRef, Html, Selector};

/// Main-content candidates, highest priority first
///
/// Semantic containers come first, then common content class and id
/// conventions, and finally the whole body.
pub const CONTENT_SELECTORS: &[&str] = &[
    "main",
    "article",
    "[role=\"main\"]",
    ".main-content",
    ".article-content",
    ".article-body",
    ".post-content",
    ".entry-content",
    ".story-body",
    ".content",
    "#main-content",
    "#content",
    "#main",
    "body",
];

/// A selected content container and the candidate that matched it
#[derive(Debug, Clone, Copy)]
pub struct ContentSelection<'a> {
    /// The CSS selector from [`CONTENT_SELECTORS`] that matched
    pub selector: &'static str,

    /// The first matching element in document order
    pub element: ElementRef<'a>,
}

/// Picks the main content container of an already-pruned document
///
/// Candidates are tried in [`CONTENT_SELECTORS`] order and the first one that
/// matches any attached element wins, even if a later candidate would match a
/// tighter container.
///
/// # Returns
///
/// * `Some(ContentSelection)` - The winning candidate
/// * `None` - Nothing matched (the document has no root or body left)
pub fn select_main_content(document: &Html) -> Option<ContentSelection<'_>> {
    let root = document
        .tree
        .root()
        .children()
        .find_map(ElementRef::wrap)?;

    for candidate in CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(candidate) else {
            continue;
        };

        if let Some(element) = root.select(&selector).next() {
            tracing::trace!("Main content matched selector '{}'", candidate);
            return Some(ContentSelection {
                selector: candidate,
                element,
            });
        }
    }

    None
}
