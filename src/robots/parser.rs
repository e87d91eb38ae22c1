//! Blanket-disallow detection for robots.txt content

/// Returns true if the robots.txt content contains a `Disallow: /` line
///
/// A line counts when, after stripping `#` comments, its directive name is
/// `disallow` (any case) and its value is exactly `/`. The user-agent group
/// the line sits in is ignored, so a rule aimed at another crawler still
/// blocks the whole site. Narrower rules such as `Disallow: /private` never
/// block, and neither does the wildcard form `Disallow: /*`.
///
/// # Examples
///
/// ```
/// use finsight::robots::has_blanket_disallow;
///
/// assert!(has_blanket_disallow("User-agent: *\nDisallow: /"));
/// assert!(!has_blanket_disallow("User-agent: *\nDisallow: /admin"));
/// ```
pub fn has_blanket_disallow(content: &str) -> bool {
    content.lines().any(|line| {
        let directive = line.split('#').next().unwrap_or_default().trim();
        match directive.split_once(':') {
            Some((key, value)) => {
                key.trim().eq_ignore_ascii_case("disallow") && value.trim() == "/"
            }
            None => false,
        }
    })
}
