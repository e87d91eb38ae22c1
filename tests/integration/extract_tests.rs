//! Integration tests for the permission gate, content reducer, and batch
//! coordinator
//!
//! These tests use wiremock to stand in for real sites, including their
//! robots.txt files.

use async_trait::async_trait;
use finsight::config::Config;
use finsight::extractor::{ContentReducer, RawDocument, Renderer};
use finsight::{BatchCoordinator, FetchTarget, FinsightError, Outcome, PolicyReason};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARTICLE: &str = r#"<html>
<head><script>window.tracking = "secret";</script></head>
<body>
  <nav><a href="/">Home</a></nav>
  <div class="newsletter-signup">Subscribe to our newsletter</div>
  <article>
    <h2>Sidebar article</h2>
  </article>
  <main>
    <h1>Widgets Inc raises guidance</h1>
    <p>Shares rose 4% after the
       announcement.</p>
    <div id="comment-thread">First!</div>
    <style>.secret { color: red; }</style>
  </main>
  <footer>All rights reserved</footer>
</body>
</html>"#;

/// Creates a test configuration with short timeouts
fn create_test_config() -> Config {
    let mut config = Config::default();
    config.http.policy_timeout_ms = 1_000;
    config.http.fetch_timeout_ms = 2_000;
    config.http.connect_timeout_ms = 1_000;
    config
}

fn reducer(config: &Config) -> ContentReducer {
    ContentReducer::new(config, None).expect("Failed to build reducer")
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, route: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_bytes(html),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_blanket_disallow_blocks_without_fetching() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nDisallow: /\n").await;

    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE))
        .expect(0)
        .mount(&server)
        .await;

    let url = format!("{}/article", server.uri());
    let reducer = reducer(&create_test_config());

    let decision = reducer.check_policy(&url).await.unwrap();
    assert!(!decision.allowed);
    assert_eq!(decision.reason, PolicyReason::PathBlocked);
    assert!(decision.message.contains(&url));

    match reducer.reduce(&url).await {
        Err(FinsightError::PolicyBlocked { url: blocked, message }) => {
            assert_eq!(blocked, url);
            assert!(message.contains("disallowed"));
        }
        other => panic!("expected PolicyBlocked, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_robots_fails_open() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_page(&server, "/article", ARTICLE).await;

    let url = format!("{}/article", server.uri());
    let reducer = reducer(&create_test_config());

    let decision = reducer.check_policy(&url).await.unwrap();
    assert!(decision.allowed);
    assert_eq!(decision.reason, PolicyReason::NoPolicyFound);

    assert!(reducer.reduce(&url).await.is_ok());
}

#[tokio::test]
async fn test_slow_robots_fails_open() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("User-agent: *\nDisallow: /\n")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/article", ARTICLE).await;

    let mut config = create_test_config();
    config.http.policy_timeout_ms = 300;
    let reducer = reducer(&config);
    let url = format!("{}/article", server.uri());

    let decision = reducer.check_policy(&url).await.unwrap();
    assert!(decision.allowed);
    assert_eq!(decision.reason, PolicyReason::NoPolicyFound);
}

#[tokio::test]
async fn test_partial_disallow_is_allowed() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nDisallow: /admin\nDisallow: /private/\n").await;
    mount_page(&server, "/admin", ARTICLE).await;

    let url = format!("{}/admin", server.uri());
    let reducer = reducer(&create_test_config());

    let decision = reducer.check_policy(&url).await.unwrap();
    assert!(decision.allowed);
    assert_eq!(decision.reason, PolicyReason::PathAllowed);
    assert!(reducer.reduce(&url).await.is_ok());
}

#[tokio::test]
async fn test_reduce_selects_main_and_strips_noise() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /\n").await;
    mount_page(&server, "/article", ARTICLE).await;

    let url = format!("{}/article", server.uri());
    let reduced = reducer(&create_test_config()).reduce(&url).await.unwrap();

    assert_eq!(reduced.source_url, url);
    assert_eq!(
        reduced.lines,
        vec![
            "Widgets Inc raises guidance",
            "",
            "Shares rose 4% after the announcement.",
        ]
    );

    let text = reduced.text();
    for leaked in [
        "secret",
        "Home",
        "newsletter",
        "Sidebar article",
        "First!",
        "All rights reserved",
    ] {
        assert!(!text.contains(leaked), "found '{}' in output", leaked);
    }
}

#[tokio::test]
async fn test_reduction_is_repeatable() {
    let server = MockServer::start().await;
    mount_page(&server, "/article", ARTICLE).await;

    let url = format!("{}/article", server.uri());
    let reducer = reducer(&create_test_config());

    let first = reducer.reduce(&url).await.unwrap();
    let second = reducer.reduce(&url).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_empty_page_has_no_content() {
    let server = MockServer::start().await;
    mount_page(&server, "/blank", "<html><body>   </body></html>").await;

    let url = format!("{}/blank", server.uri());
    let result = reducer(&create_test_config()).reduce(&url).await;
    assert!(matches!(result, Err(FinsightError::NoContent { .. })));
}

#[tokio::test]
async fn test_noise_only_page_has_no_content() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/chrome",
        "<html><body><nav>Menu</nav><footer>Legal</footer><script>x()</script></body></html>",
    )
    .await;

    let url = format!("{}/chrome", server.uri());
    let result = reducer(&create_test_config()).reduce(&url).await;
    assert!(matches!(result, Err(FinsightError::NoContent { .. })));
}

#[tokio::test]
async fn test_fetch_raw_returns_unreduced_body() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nDisallow: /private\n").await;
    mount_page(&server, "/article", ARTICLE).await;

    let url = format!("{}/article", server.uri());
    let raw = reducer(&create_test_config()).fetch_raw(&url).await.unwrap();

    assert_eq!(raw.url, url);
    assert_eq!(raw.status_code, 200);
    assert_eq!(raw.body, ARTICLE);
    assert!(raw.body.contains("window.tracking"));
    assert_eq!(
        raw.content_type.as_deref(),
        Some("text/html; charset=utf-8")
    );
}

#[tokio::test]
async fn test_fetch_raw_respects_blanket_disallow() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nDisallow: /\n").await;

    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE))
        .expect(0)
        .mount(&server)
        .await;

    let url = format!("{}/article", server.uri());
    let result = reducer(&create_test_config()).fetch_raw(&url).await;
    assert!(matches!(result, Err(FinsightError::PolicyBlocked { .. })));
}

#[tokio::test]
async fn test_server_error_is_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let url = format!("{}/broken", server.uri());
    match reducer(&create_test_config()).reduce(&url).await {
        Err(FinsightError::Fetch { url: failed, cause }) => {
            assert_eq!(failed, url);
            assert!(cause.contains("500"), "cause was '{}'", cause);
        }
        other => panic!("expected Fetch, got {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_page_is_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(ARTICLE)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = create_test_config();
    config.http.fetch_timeout_ms = 300;
    let url = format!("{}/slow", server.uri());

    match reducer(&config).reduce(&url).await {
        Err(FinsightError::Fetch { cause, .. }) => assert_eq!(cause, "Request timeout"),
        other => panic!("expected Fetch, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_host_is_fetch_error() {
    let result = reducer(&create_test_config())
        .reduce("http://127.0.0.1:1/quote")
        .await;
    assert!(matches!(result, Err(FinsightError::Fetch { .. })));
}

#[tokio::test]
async fn test_malformed_url_is_validation_error() {
    let reducer = reducer(&create_test_config());
    for bad in ["", "not a url", "/relative/page", "ftp://example.com/file"] {
        let result = reducer.reduce(bad).await;
        assert!(
            matches!(result, Err(FinsightError::Validation(_))),
            "'{}' gave {:?}",
            bad,
            result
        );
    }
}

#[tokio::test]
async fn test_configured_user_agent_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/article"))
        .and(header("user-agent", "FinsightTest/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = create_test_config();
    config.http.user_agent = "FinsightTest/1.0".to_string();
    let url = format!("{}/article", server.uri());

    assert!(reducer(&config).reduce(&url).await.is_ok());
}

#[tokio::test]
async fn test_truncation_limit_applies() {
    let server = MockServer::start().await;
    mount_page(&server, "/article", ARTICLE).await;

    let mut config = create_test_config();
    config.extractor.max_text_chars = Some(10);
    let url = format!("{}/article", server.uri());

    let reduced = reducer(&config).reduce(&url).await.unwrap();
    assert!(reduced.truncated);
    assert!(reduced.char_count() <= 10);
}

#[tokio::test]
async fn test_batch_reports_each_url_in_order() {
    let open = MockServer::start().await;
    mount_page(&open, "/one", ARTICLE).await;
    mount_page(&open, "/three", "<html><body><p>Third page</p></body></html>").await;

    let closed = MockServer::start().await;
    mount_robots(&closed, "User-agent: *\nDisallow: /\n").await;

    let urls = vec![
        format!("{}/one", open.uri()),
        format!("{}/two", closed.uri()),
        format!("{}/three", open.uri()),
    ];

    let coordinator = BatchCoordinator::new(Arc::new(reducer(&create_test_config())), 1);
    let result = coordinator.reduce_all(&urls).await.unwrap();

    assert_eq!(result.total_urls, 3);
    assert_eq!(result.succeeded(), 2);
    assert_eq!(result.failed(), 1);

    let entry_urls: Vec<&str> = result.iter().map(|e| e.url.as_str()).collect();
    assert_eq!(entry_urls, urls.iter().map(String::as_str).collect::<Vec<_>>());

    assert!(result.entries[0].outcome.is_success());
    assert_eq!(
        result.entries[1].outcome.error().map(|e| e.kind),
        Some(finsight::ErrorKind::PolicyBlocked)
    );
    match &result.entries[2].outcome {
        Outcome::Success { data } => assert_eq!(data.text(), "Third page"),
        other => panic!("expected success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_batch_keeps_order_with_concurrency() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><p>Slow page</p></body></html>")
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/fast", "<html><body><p>Fast page</p></body></html>").await;

    let urls = vec![
        format!("{}/slow", server.uri()),
        format!("{}/fast", server.uri()),
        "not a url".to_string(),
        format!("{}/fast", server.uri()),
    ];

    let coordinator = BatchCoordinator::new(Arc::new(reducer(&create_test_config())), 3);
    let result = coordinator.reduce_all(&urls).await.unwrap();

    let texts: Vec<Option<String>> = result
        .iter()
        .map(|e| e.outcome.data().map(|d| d.text()))
        .collect();
    assert_eq!(
        texts,
        vec![
            Some("Slow page".to_string()),
            Some("Fast page".to_string()),
            None,
            Some("Fast page".to_string()),
        ]
    );
    assert_eq!(
        result.entries[2].outcome.error().map(|e| e.kind),
        Some(finsight::ErrorKind::Validation)
    );
}

#[tokio::test]
async fn test_empty_batch_is_rejected() {
    let coordinator = BatchCoordinator::new(Arc::new(reducer(&create_test_config())), 1);
    let result = coordinator.reduce_all(&[]).await;
    assert!(matches!(result, Err(FinsightError::Validation(_))));
}

/// Renderer that serves fixed markup without touching the network
struct FixedRenderer;

#[async_trait]
impl Renderer for FixedRenderer {
    async fn render(&self, target: &FetchTarget) -> Result<RawDocument, FinsightError> {
        Ok(RawDocument {
            url: target.to_string(),
            status_code: 200,
            body: "<html><body><main><p>Rendered by script</p></main></body></html>".to_string(),
            content_type: Some("text/html".to_string()),
        })
    }
}

#[tokio::test]
async fn test_render_policy_routes_to_renderer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = create_test_config();
    config.extractor.dynamic_render_hosts = vec!["127.0.0.1".to_string()];
    let reducer = ContentReducer::new(&config, Some(Arc::new(FixedRenderer))).unwrap();

    let url = format!("{}/app", server.uri());
    let reduced = reducer.reduce(&url).await.unwrap();
    assert_eq!(reduced.text(), "Rendered by script");
}

#[tokio::test]
async fn test_render_policy_without_renderer_fetches_statically() {
    let server = MockServer::start().await;
    mount_page(&server, "/app", ARTICLE).await;

    let mut config = create_test_config();
    config.extractor.dynamic_render_hosts = vec!["127.0.0.1".to_string()];
    let url = format!("{}/app", server.uri());

    let reduced = reducer(&config).reduce(&url).await.unwrap();
    assert_eq!(reduced.lines[0], "Widgets Inc raises guidance");
}
