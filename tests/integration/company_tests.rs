//! Integration tests for role dispatch and company report composition
//!
//! Market data comes from an in-memory fake provider; encyclopedia pages are
//! served by wiremock.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use finsight::config::Config;
use finsight::market::{
    CompanyProfile, FinancialStatements, MarketData, MarketError, NewsArticle, Quote,
    ReportStatus, MAX_NEWS_ARTICLES,
};
use finsight::{
    Capability, Collaborators, Dispatcher, ErrorKind, FinsightError, Outcome, Request, Response,
    Role,
};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ACME_ARTICLE: &str = r#"<html><body>
  <div id="content">
    <p>Acme Corp is an American manufacturer of anvils. It was founded in 1949 by a coyote.</p>
    <p>The company headquarters are in Tucson, Arizona. The CEO is Wile Coyote.</p>
  </div>
</body></html>"#;

/// In-memory provider returning canned results
struct FakeMarket {
    quote: Result<Quote, MarketError>,
    profile: Result<CompanyProfile, MarketError>,
    financials: Result<FinancialStatements, MarketError>,
    news: Result<Vec<NewsArticle>, MarketError>,
}

impl FakeMarket {
    fn healthy() -> Self {
        Self {
            quote: Ok(Quote::from_prices("ACME", 105.0, 100.0)),
            profile: Ok(CompanyProfile {
                symbol: "ACME".to_string(),
                company_name: "Acme Corp".to_string(),
                sector: Some("Industrials".to_string()),
                ..Default::default()
            }),
            financials: Ok(FinancialStatements {
                revenue: Some(1_000.0),
                net_income: Some(50.0),
                total_assets: Some(500.0),
                total_liabilities: Some(250.0),
            }),
            news: Ok(articles(3)),
        }
    }
}

#[async_trait]
impl MarketData for FakeMarket {
    async fn quote(&self, _symbol: &str) -> Result<Quote, MarketError> {
        self.quote.clone()
    }

    async fn profile(&self, _symbol: &str) -> Result<CompanyProfile, MarketError> {
        self.profile.clone()
    }

    async fn financials(&self, _symbol: &str) -> Result<FinancialStatements, MarketError> {
        self.financials.clone()
    }

    async fn news(&self, _symbol: &str) -> Result<Vec<NewsArticle>, MarketError> {
        self.news.clone()
    }
}

/// Articles published one hour apart, oldest first
fn articles(count: usize) -> Vec<NewsArticle> {
    let start = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();
    (0..count)
        .map(|i| NewsArticle {
            title: format!("Story {}", i),
            summary: None,
            publisher: Some("Wire".to_string()),
            published: Some(start + ChronoDuration::hours(i as i64)),
            link: format!("https://news.example/{}", i),
        })
        .collect()
}

fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.http.policy_timeout_ms = 1_000;
    config.http.fetch_timeout_ms = 2_000;
    config.background.wiki_base_url = format!("{}/wiki/", server.uri());
    config
}

fn dispatcher(config: &Config, market: Option<FakeMarket>) -> Dispatcher {
    let mut collaborators = Collaborators::new();
    if let Some(market) = market {
        collaborators = collaborators.with_market_data(Arc::new(market));
    }
    Dispatcher::new(config, collaborators).expect("Failed to build dispatcher")
}

async fn mount_wiki(server: &MockServer, route: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(ACME_ARTICLE))
        .mount(server)
        .await;
}

async fn report(dispatcher: &Dispatcher, symbol: &str) -> finsight::market::CompanyReport {
    let response = dispatcher
        .execute(
            Role::All,
            Request::CompanyReport {
                symbol: symbol.to_string(),
            },
        )
        .await
        .expect("report request failed");
    match response {
        Response::Report(report) => *report,
        other => panic!("expected a report, got {:?}", other),
    }
}

#[tokio::test]
async fn test_complete_report() {
    let server = MockServer::start().await;
    mount_wiki(&server, "/wiki/Acme_Corp").await;

    let dispatcher = dispatcher(&config_for(&server), Some(FakeMarket::healthy()));
    let report = report(&dispatcher, " acme ").await;

    assert_eq!(report.symbol, "ACME");
    assert_eq!(report.status, ReportStatus::Complete);
    assert_eq!(report.news.data().map(Vec::len), Some(3));

    let financials = report.financials.data().expect("financials missing");
    assert_eq!(financials.return_on_equity, Some(20.0));
    assert_eq!(financials.return_on_assets, Some(10.0));

    let background = report.background.data().expect("background missing");
    assert_eq!(background.company_name, "Acme Corp");
    assert_eq!(
        background.key_facts.get("founded").map(String::as_str),
        Some("1949")
    );
    assert!(background.key_facts.contains_key("headquarters"));
    assert!(background.key_facts.contains_key("ceo"));
}

#[tokio::test]
async fn test_partial_report_uses_symbol_for_background() {
    let server = MockServer::start().await;
    mount_wiki(&server, "/wiki/ACME").await;

    let market = FakeMarket {
        profile: Err(MarketError::Unavailable("profile service down".to_string())),
        ..FakeMarket::healthy()
    };
    let dispatcher = dispatcher(&config_for(&server), Some(market));
    let report = report(&dispatcher, "ACME").await;

    assert_eq!(report.status, ReportStatus::Partial);
    assert!(report.quote.is_success());
    assert_eq!(
        report.profile.error().map(|e| e.kind),
        Some(ErrorKind::UpstreamUnavailable)
    );
    assert_eq!(
        report.background.data().map(|b| b.company_name.as_str()),
        Some("ACME")
    );
}

#[tokio::test]
async fn test_failed_financials_make_report_partial() {
    let server = MockServer::start().await;
    mount_wiki(&server, "/wiki/Acme_Corp").await;

    let market = FakeMarket {
        financials: Err(MarketError::Unavailable("statements delayed".to_string())),
        ..FakeMarket::healthy()
    };
    let dispatcher = dispatcher(&config_for(&server), Some(market));
    let report = report(&dispatcher, "ACME").await;

    assert_eq!(report.status, ReportStatus::Partial);
    assert!(report.quote.is_success());
    assert!(report.news.is_success());
    assert_eq!(
        report.financials.error().map(|e| e.kind),
        Some(ErrorKind::UpstreamUnavailable)
    );
}

#[tokio::test]
async fn test_financial_metrics_request() {
    let server = MockServer::start().await;
    let market = FakeMarket {
        financials: Ok(FinancialStatements {
            revenue: Some(2_000.0),
            net_income: Some(-40.0),
            total_assets: Some(400.0),
            total_liabilities: Some(400.0),
        }),
        ..FakeMarket::healthy()
    };
    let dispatcher = dispatcher(&config_for(&server), Some(market));

    let response = dispatcher
        .execute(
            Role::CurrentValuation,
            Request::FinancialMetrics {
                symbol: " acme".to_string(),
            },
        )
        .await
        .unwrap();

    match response {
        Response::Financials(metrics) => {
            assert_eq!(metrics.symbol, "ACME");
            assert_eq!(metrics.revenue, Some(2_000.0));
            assert_eq!(metrics.return_on_equity, None);
            assert_eq!(metrics.return_on_assets, Some(-10.0));
        }
        other => panic!("expected financials, got {:?}", other),
    }

    let denied = dispatcher
        .dispatch(
            Role::FutureOutlook,
            Request::FinancialMetrics {
                symbol: "ACME".to_string(),
            },
        )
        .await;
    assert_eq!(
        denied.error().map(|e| e.kind),
        Some(ErrorKind::CapabilityDenied)
    );
}

#[tokio::test]
async fn test_failed_report_still_returns_every_section() {
    let server = MockServer::start().await;

    let market = FakeMarket {
        quote: Err(MarketError::SymbolNotFound("ZZZZ".to_string())),
        profile: Err(MarketError::SymbolNotFound("ZZZZ".to_string())),
        financials: Err(MarketError::SymbolNotFound("ZZZZ".to_string())),
        news: Ok(Vec::new()),
    };
    let dispatcher = dispatcher(&config_for(&server), Some(market));
    let report = report(&dispatcher, "ZZZZ").await;

    assert_eq!(report.status, ReportStatus::Failed);
    assert_eq!(
        report.quote.error().map(|e| e.kind),
        Some(ErrorKind::SymbolNotFound)
    );
    assert!(report.news.is_success());
    assert_eq!(
        report.background.error().map(|e| e.kind),
        Some(ErrorKind::Fetch)
    );
}

#[tokio::test]
async fn test_report_without_provider() {
    let server = MockServer::start().await;
    mount_wiki(&server, "/wiki/ACME").await;

    let dispatcher = dispatcher(&config_for(&server), None);
    let report = report(&dispatcher, "ACME").await;

    assert_eq!(report.status, ReportStatus::Failed);
    for kind in [
        report.quote.error().map(|e| e.kind),
        report.profile.error().map(|e| e.kind),
        report.financials.error().map(|e| e.kind),
        report.news.error().map(|e| e.kind),
    ] {
        assert_eq!(kind, Some(ErrorKind::UpstreamUnavailable));
    }
    assert!(report.background.is_success());
}

#[tokio::test]
async fn test_market_requests_without_provider_are_unavailable() {
    let server = MockServer::start().await;
    let dispatcher = dispatcher(&config_for(&server), None);

    for request in [
        Request::Quote {
            symbol: "ACME".to_string(),
        },
        Request::CompanyProfile {
            symbol: "ACME".to_string(),
        },
        Request::CompanyNews {
            symbol: "ACME".to_string(),
        },
        Request::FinancialMetrics {
            symbol: "ACME".to_string(),
        },
    ] {
        let result = dispatcher.execute(Role::All, request).await;
        assert!(matches!(result, Err(FinsightError::UpstreamUnavailable(_))));
    }
}

#[tokio::test]
async fn test_symbol_not_found_is_distinct_from_outage() {
    let server = MockServer::start().await;

    let missing = FakeMarket {
        quote: Err(MarketError::SymbolNotFound("NOPE".to_string())),
        ..FakeMarket::healthy()
    };
    let outcome = dispatcher(&config_for(&server), Some(missing))
        .dispatch(
            Role::CurrentValuation,
            Request::Quote {
                symbol: "nope".to_string(),
            },
        )
        .await;
    assert_eq!(
        outcome.error().map(|e| e.kind),
        Some(ErrorKind::SymbolNotFound)
    );

    let down = FakeMarket {
        quote: Err(MarketError::Unavailable("rate limited".to_string())),
        ..FakeMarket::healthy()
    };
    let outcome = dispatcher(&config_for(&server), Some(down))
        .dispatch(
            Role::CurrentValuation,
            Request::Quote {
                symbol: "acme".to_string(),
            },
        )
        .await;
    assert_eq!(
        outcome.error().map(|e| e.kind),
        Some(ErrorKind::UpstreamUnavailable)
    );
}

#[tokio::test]
async fn test_invalid_symbol_is_validation_error() {
    let server = MockServer::start().await;
    let dispatcher = dispatcher(&config_for(&server), Some(FakeMarket::healthy()));

    let result = dispatcher
        .execute(
            Role::All,
            Request::CompanyReport {
                symbol: "   ".to_string(),
            },
        )
        .await;
    assert!(matches!(result, Err(FinsightError::Validation(_))));
}

#[tokio::test]
async fn test_role_without_capability_is_denied() {
    let server = MockServer::start().await;
    let dispatcher = dispatcher(&config_for(&server), Some(FakeMarket::healthy()));

    let outcome = dispatcher
        .dispatch(
            Role::CurrentValuation,
            Request::CompanyNews {
                symbol: "ACME".to_string(),
            },
        )
        .await;

    let error = outcome.error().expect("expected denial");
    assert_eq!(error.kind, ErrorKind::CapabilityDenied);
    assert_eq!(
        error.message,
        "Role 'current-valuation' is not permitted to use 'company-news'"
    );
}

#[tokio::test]
async fn test_role_overrides_from_config() {
    let server = MockServer::start().await;
    let mut config = config_for(&server);
    config
        .roles
        .insert("current-valuation".to_string(), vec![Capability::CompanyNews]);

    let dispatcher = dispatcher(&config, Some(FakeMarket::healthy()));

    let news = dispatcher
        .execute(
            Role::CurrentValuation,
            Request::CompanyNews {
                symbol: "ACME".to_string(),
            },
        )
        .await;
    assert!(news.is_ok());

    let quote = dispatcher
        .execute(
            Role::CurrentValuation,
            Request::Quote {
                symbol: "ACME".to_string(),
            },
        )
        .await;
    assert!(matches!(
        quote,
        Err(FinsightError::CapabilityDenied { .. })
    ));
}

#[tokio::test]
async fn test_background_falls_back_to_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wiki/Acme_Corp"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    mount_wiki(&server, "/wiki/Special:Search/Acme_Corp").await;

    let dispatcher = dispatcher(&config_for(&server), None);
    let response = dispatcher
        .execute(
            Role::FutureOutlook,
            Request::CompanyBackground {
                company_name: "Acme  Corp".to_string(),
            },
        )
        .await
        .unwrap();

    match response {
        Response::Background(background) => {
            assert!(background
                .source_url
                .ends_with("/wiki/Special:Search/Acme_Corp"));
            assert!(background.preview.starts_with("Acme Corp is an American"));
        }
        other => panic!("expected background, got {:?}", other),
    }
}

#[tokio::test]
async fn test_news_is_capped_and_most_recent_first() {
    let server = MockServer::start().await;
    let market = FakeMarket {
        news: Ok(articles(15)),
        ..FakeMarket::healthy()
    };
    let dispatcher = dispatcher(&config_for(&server), Some(market));

    let outcome = dispatcher
        .dispatch(
            Role::FutureOutlook,
            Request::CompanyNews {
                symbol: "ACME".to_string(),
            },
        )
        .await;

    match outcome {
        Outcome::Success {
            data: Response::News(news),
        } => {
            assert_eq!(news.len(), MAX_NEWS_ARTICLES);
            assert_eq!(news[0].title, "Story 14");
            assert_eq!(news[9].title, "Story 5");
        }
        other => panic!("expected news, got {:?}", other),
    }
}

#[tokio::test]
async fn test_outcome_json_shape() {
    let server = MockServer::start().await;
    let dispatcher = dispatcher(&config_for(&server), None);

    let outcome = dispatcher
        .dispatch(
            Role::StockHistory,
            Request::CompanyProfile {
                symbol: "ACME".to_string(),
            },
        )
        .await;

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["status"], "error");
    assert_eq!(json["error"]["kind"], "capability_denied");
}
