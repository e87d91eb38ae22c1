//! Human-readable rendering of results
//!
//! The JSON form of every result is its serde serialization; this module
//! produces the terminal form.

use crate::batch::BatchResult;
use crate::extractor::RawDocument;
use crate::market::{
    CompanyBackground, CompanyProfile, CompanyReport, FinancialMetrics, NewsArticle, Quote,
};
use crate::output::{ErrorRecord, Outcome};
use crate::robots::PolicyDecision;
use crate::roles::{Response, RoleTable};

/// Formats an error as a single line
pub fn render_error(error: &ErrorRecord) -> String {
    let kind = serde_json::to_value(error.kind)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| format!("{:?}", error.kind));
    format!("error [{}]: {}", kind, error.message)
}

/// Formats a successful response payload
pub fn render_response(response: &Response) -> String {
    match response {
        Response::Policy(decision) => render_policy(decision),
        Response::Raw(raw) => render_raw(raw),
        Response::Content(text) => {
            let mut out = text.text();
            if text.truncated {
                out.push_str("\n[truncated]");
            }
            out
        }
        Response::Batch(batch) => render_batch(batch),
        Response::Quote(quote) => render_quote(quote),
        Response::Profile(profile) => render_profile(profile),
        Response::Financials(metrics) => render_financials(metrics),
        Response::News(news) => render_news(news),
        Response::Background(background) => render_background(background),
        Response::Report(report) => render_report(report),
    }
}

fn render_policy(decision: &PolicyDecision) -> String {
    format!(
        "{} ({:?})\n{}",
        if decision.allowed { "allowed" } else { "blocked" },
        decision.reason,
        decision.message
    )
}

fn render_raw(raw: &RawDocument) -> String {
    format!(
        "{} (HTTP {}, {})\n\n{}",
        raw.url,
        raw.status_code,
        raw.content_type.as_deref().unwrap_or("unknown content type"),
        raw.body
    )
}

fn render_batch(batch: &BatchResult) -> String {
    let mut out = String::new();

    for (index, entry) in batch.iter().enumerate() {
        out.push_str(&format!("=== [{}] {} ===\n", index + 1, entry.url));
        match &entry.outcome {
            Outcome::Success { data } => {
                out.push_str(&data.text());
                out.push('\n');
            }
            Outcome::Error { error } => {
                out.push_str(&render_error(error));
                out.push('\n');
            }
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "{} of {} URLs reduced, {} failed",
        batch.succeeded(),
        batch.total_urls,
        batch.failed()
    ));
    out
}

fn render_quote(quote: &Quote) -> String {
    let mut out = String::new();
    match &quote.company_name {
        Some(name) => out.push_str(&format!("{} ({})\n", name, quote.symbol)),
        None => out.push_str(&format!("{}\n", quote.symbol)),
    }
    out.push_str(&format!(
        "  Price: {:.2} {} ({:+.2}, {:+.2}%)\n",
        quote.price, quote.currency, quote.change, quote.change_percent
    ));
    out.push_str(&format!("  Previous close: {:.2}\n", quote.previous_close));
    out.push_str(&format!("  Volume: {}", quote.volume));
    if let Some(cap) = quote.market_cap {
        out.push_str(&format!("\n  Market cap: {}", cap));
    }
    out
}

fn render_profile(profile: &CompanyProfile) -> String {
    let mut out = format!("{} ({})", profile.company_name, profile.symbol);

    let fields = [
        ("Sector", profile.sector.clone()),
        ("Industry", profile.industry.clone()),
        ("Location", profile.location()),
        ("Employees", profile.employees.map(|n| n.to_string())),
        ("Officer", profile.officer.clone()),
        ("Website", profile.website.clone()),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            out.push_str(&format!("\n  {}: {}", label, value));
        }
    }

    if let Some(description) = &profile.description {
        out.push_str(&format!("\n\n{}", description));
    }
    out
}

/// Formats an amount with thousands separators, e.g. "$1,234,567"
fn format_amount(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if value < 0.0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

fn render_financials(metrics: &FinancialMetrics) -> String {
    let amount = |value: Option<f64>| {
        value
            .map(format_amount)
            .unwrap_or_else(|| "N/A".to_string())
    };
    let ratio = |value: Option<f64>| {
        value
            .map(|v| format!("{:.2}%", v))
            .unwrap_or_else(|| "N/A".to_string())
    };

    format!(
        "{}\n  Revenue: {}\n  Net income: {}\n  Total assets: {}\n  Total liabilities: {}\n  \
         Return on equity: {}\n  Return on assets: {}",
        metrics.symbol,
        amount(metrics.revenue),
        amount(metrics.net_income),
        amount(metrics.total_assets),
        amount(metrics.total_liabilities),
        ratio(metrics.return_on_equity),
        ratio(metrics.return_on_assets)
    )
}

fn render_news(news: &[NewsArticle]) -> String {
    if news.is_empty() {
        return "No recent news".to_string();
    }

    let mut lines = Vec::with_capacity(news.len());
    for (index, article) in news.iter().enumerate() {
        let date = article
            .published
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "----------".to_string());
        let mut line = format!("{:>2}. {} {}", index + 1, date, article.title);
        if let Some(publisher) = &article.publisher {
            line.push_str(&format!(" ({})", publisher));
        }
        line.push_str(&format!("\n    {}", article.link));
        lines.push(line);
    }
    lines.join("\n")
}

fn render_background(background: &CompanyBackground) -> String {
    let mut out = format!(
        "{} (source: {}, {})\n",
        background.company_name, background.source, background.source_url
    );
    for (fact, value) in &background.key_facts {
        out.push_str(&format!("  {}: {}\n", fact, value));
    }
    out.push('\n');
    out.push_str(&background.preview);
    out
}

fn render_section<T>(
    out: &mut String,
    title: &str,
    outcome: &Outcome<T>,
    render: fn(&T) -> String,
) {
    out.push_str(&format!("\n--- {} ---\n", title));
    match outcome {
        Outcome::Success { data } => out.push_str(&render(data)),
        Outcome::Error { error } => out.push_str(&render_error(error)),
    }
    out.push('\n');
}

/// Formats a company report, one section per collaborator
pub fn render_report(report: &CompanyReport) -> String {
    let mut out = format!(
        "Company report for {} ({:?}, generated {})\n",
        report.symbol,
        report.status,
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    render_section(&mut out, "Quote", &report.quote, render_quote);
    render_section(&mut out, "Profile", &report.profile, render_profile);
    render_section(&mut out, "Financials", &report.financials, render_financials);
    render_section(&mut out, "News", &report.news, |news: &Vec<NewsArticle>| {
        render_news(news)
    });
    render_section(&mut out, "Background", &report.background, render_background);
    out
}

/// Formats the role table, one role per line
pub fn render_role_table(table: &RoleTable) -> String {
    table
        .iter()
        .map(|(role, capabilities)| {
            let names: Vec<&str> = capabilities.iter().map(|c| c.as_str()).collect();
            format!("{:<18} {}", role, names.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
