//! Structural and heuristic noise removal
//!
//! Both passes detach elements from the document tree, which removes their
//! whole subtree from every later selection and from text extraction.

use ego_tree::NodeId;
use scraper::{ElementRef, Html};

/// Tags removed outright: page chrome, non-visual content, form controls, media
pub const NOISE_TAGS: &[&str] = &[
    // Navigation and structural chrome
    "nav", "header", "footer", "aside",
    // Executable and non-visual content
    "script", "style", "noscript", "iframe", "embed", "object", "template",
    // Interactive form controls
    "form", "button", "input", "select", "textarea", "label", "fieldset", "legend", "option",
    "optgroup", "datalist",
    // Non-text media
    "img", "svg", "canvas", "audio", "video", "picture", "source", "track", "map",
];

/// Substrings that mark an element as noise when found in its class or id
pub const NOISE_PATTERNS: &[&str] = &[
    "navigation",
    "menu",
    "sidebar",
    "advertisement",
    "banner",
    "social",
    "share",
    "comment",
    "related",
    "recommended",
    "popular",
    "trending",
    "newsletter",
    "promo",
    "popup",
    "modal",
    "overlay",
];

/// Elements never removed by the class/id pass
const PATTERN_EXEMPT: &[&str] = &["html", "body"];

/// Removes noise from a parsed document
///
/// First every element whose tag is in [`NOISE_TAGS`] is removed, then, for
/// each pattern in [`NOISE_PATTERNS`] in turn, every remaining element whose
/// `class` or `id` contains the pattern (case-insensitively). The document's
/// `<html>` and `<body>` elements are exempt from the pattern pass. Running it
/// twice removes nothing the second time.
///
/// # Returns
///
/// The number of elements detached
pub fn prune_noise(document: &mut Html) -> usize {
    let tag_ids = collect_ids(document, |element| {
        NOISE_TAGS.contains(&element.value().name())
    });
    let mut removed = detach_all(document, tag_ids);

    for pattern in NOISE_PATTERNS {
        let ids = collect_ids(document, |element| {
            !PATTERN_EXEMPT.contains(&element.value().name())
                && attribute_contains(element, pattern)
        });
        removed += detach_all(document, ids);
    }

    tracing::trace!("Pruned {} noise elements", removed);
    removed
}

/// Checks the class and id attributes for a lowercase infix
fn attribute_contains(element: &ElementRef<'_>, pattern: &str) -> bool {
    ["class", "id"].iter().any(|name| {
        element
            .value()
            .attr(name)
            .is_some_and(|value| value.to_lowercase().contains(pattern))
    })
}

/// Collects ids of attached elements matching `predicate`
///
/// Walks from the document root, so elements inside already-detached
/// subtrees are never visited.
fn collect_ids<F>(document: &Html, predicate: F) -> Vec<NodeId>
where
    F: Fn(&ElementRef<'_>) -> bool,
{
    document
        .tree
        .root()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| predicate(element))
        .map(|element| element.id())
        .collect()
}

fn detach_all(document: &mut Html, ids: Vec<NodeId>) -> usize {
    let mut removed = 0;
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
            removed += 1;
        }
    }
    removed
}
