//! Visible-text extraction and whitespace normalization

use ego_tree::iter::Edge;
use scraper::{ElementRef, Node};

/// Elements that start and end on their own line
const LINE_BLOCKS: &[&str] = &[
    "address", "dd", "details", "dialog", "div", "dt", "figcaption", "hr", "li", "summary",
    "tr", "td", "th", "caption", "tbody", "thead", "tfoot",
];

/// Elements separated from their neighbours by a blank line
const PARAGRAPH_BLOCKS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "pre", "ul", "ol", "dl", "table",
    "section", "article", "main", "figure", "body",
];

/// Collects text and the line breaks requested between fragments
///
/// Breaks are only written once the next visible fragment arrives, so a run
/// of nested block boundaries never produces more than one blank line and the
/// output never starts with a break.
#[derive(Default)]
struct TextSink {
    out: String,
    pending_breaks: usize,
}

impl TextSink {
    fn request_breaks(&mut self, count: usize) {
        self.pending_breaks = self.pending_breaks.max(count);
    }

    fn push(&mut self, fragment: &str) {
        if fragment.trim().is_empty() {
            if self.pending_breaks == 0 && !self.out.is_empty() && !self.out.ends_with(' ') {
                self.out.push(' ');
            }
            return;
        }

        if !self.out.is_empty() {
            for _ in 0..self.pending_breaks {
                self.out.push('\n');
            }
        }
        self.pending_breaks = 0;
        self.out.push_str(fragment);
    }
}

fn block_breaks(name: &str) -> Option<usize> {
    if PARAGRAPH_BLOCKS.contains(&name) {
        Some(2)
    } else if LINE_BLOCKS.contains(&name) {
        Some(1)
    } else {
        None
    }
}

/// Extracts the visible text of an element subtree
///
/// Block-level elements become line breaks and `<br>` a single break. Source
/// newlines inside text are treated as spaces, except within `<pre>`.
pub fn extract_text(root: ElementRef<'_>) -> String {
    let mut sink = TextSink::default();
    let mut pre_depth = 0usize;

    for edge in root.traverse() {
        match edge {
            Edge::Open(node) => match node.value() {
                Node::Text(text) => {
                    if pre_depth > 0 {
                        sink.push(text);
                    } else {
                        sink.push(&text.replace(['\n', '\r'], " "));
                    }
                }
                Node::Element(element) => {
                    let name = element.name();
                    if name == "br" {
                        sink.request_breaks(1);
                    } else if let Some(breaks) = block_breaks(name) {
                        sink.request_breaks(breaks);
                    }
                    if name == "pre" {
                        pre_depth += 1;
                    }
                }
                _ => {}
            },
            Edge::Close(node) => {
                if let Node::Element(element) = node.value() {
                    let name = element.name();
                    if let Some(breaks) = block_breaks(name) {
                        sink.request_breaks(breaks);
                    }
                    if name == "pre" {
                        pre_depth = pre_depth.saturating_sub(1);
                    }
                }
            }
        }
    }

    sink.out
}

/// Normalizes extracted text into lines
///
/// - Tabs and non-breaking spaces become single spaces
/// - Runs of two or more spaces collapse to one
/// - Lines are trimmed
/// - Runs of blank lines collapse to exactly one blank line
/// - Leading and trailing blank lines are dropped
///
/// # Examples
///
/// ```
/// use finsight::extractor::normalize_whitespace;
///
/// let lines = normalize_whitespace("Revenue\tgrew   12%\n\n\n\nGuidance raised");
/// assert_eq!(lines, vec!["Revenue grew 12%", "", "Guidance raised"]);
/// ```
pub fn normalize_whitespace(raw: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut blank_pending = false;

    for line in raw.lines() {
        let collapsed = collapse_spaces(line);
        let trimmed = collapsed.trim();

        if trimmed.is_empty() {
            blank_pending = !lines.is_empty();
            continue;
        }

        if blank_pending {
            lines.push(String::new());
            blank_pending = false;
        }
        lines.push(trimmed.to_string());
    }

    lines
}

fn collapse_spaces(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut previous_space = false;
    for c in line.chars() {
        if matches!(c, ' ' | '\t' | '\u{a0}') {
            if !previous_space {
                out.push(' ');
            }
            previous_space = true;
        } else {
            out.push(c);
            previous_space = false;
        }
    }
    out
}

/// Cuts lines so their newline-joined length is at most `max_chars`
///
/// # Returns
///
/// The kept lines and whether anything was cut
pub fn truncate_lines(lines: Vec<String>, max_chars: usize) -> (Vec<String>, bool) {
    let mut kept = Vec::with_capacity(lines.len());
    let mut used = 0usize;

    for line in lines {
        let separator = usize::from(!kept.is_empty());
        let available = max_chars.saturating_sub(used + separator);
        let length = line.chars().count();

        if used + separator > max_chars || available == 0 {
            return (finish_truncated(kept), true);
        }

        if length <= available {
            used += separator + length;
            kept.push(line);
        } else {
            kept.push(line.chars().take(available).collect::<String>().trim_end().to_string());
            return (finish_truncated(kept), true);
        }
    }

    (kept, false)
}

/// Drops a dangling blank line left at the end of a cut
fn finish_truncated(mut kept: Vec<String>) -> Vec<String> {
    while kept.last().is_some_and(|line| line.is_empty()) {
        kept.pop();
    }
    kept
}
