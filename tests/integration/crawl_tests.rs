//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use jutsu_crawler::config::{Config, CrawlerConfig, HttpConfig, OutputConfig, OutputFormat};
use jutsu_crawler::crawler::{run_crawl, Coordinator};
use jutsu_crawler::output::MemorySink;
use jutsu_crawler::JutsuRecord;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING_PATH: &str = "/wiki/Special:BrowseData/Jutsu";

/// Creates a test configuration crawling the mock server's listing
fn create_test_config(base_url: &str) -> Config {
    Config {
        crawler: CrawlerConfig {
            seed_url: format!("{}{}?limit=250&offset=0", base_url, LISTING_PATH),
            max_concurrent_requests: 4,
            max_pages: None,
        },
        http: HttpConfig {
            request_timeout: 5,
            connect_timeout: 2,
            ..HttpConfig::default()
        },
        ..Config::default()
    }
}

fn seed_url(config: &Config) -> Url {
    Url::parse(&config.crawler.seed_url).expect("Failed to parse seed URL")
}

/// Builds a listing page with the given detail hrefs and optional next href
fn listing_html(links: &[&str], next: Option<&str>) -> String {
    let items: String = links
        .iter()
        .map(|href| format!(r#"<li><a href="{}">{}</a></li>"#, href, href))
        .collect();
    let next = next
        .map(|href| format!(r#"<a class="mw-nextlink" href="{}">next 250</a>"#, href))
        .unwrap_or_default();

    format!(
        r#"<html><head><title>Browse data</title></head><body>
        <div class="smw-columnlist-container"><div class="smw-column"><ul>{}</ul></div></div>
        {}
        </body></html>"#,
        items, next
    )
}

/// Builds a detail page in the fandom skin
fn detail_html(title: &str, classification: &str, body: &str) -> String {
    format!(
        r#"<html><head><title>{title} | Narutopedia</title></head><body>
        <h1 id="firstHeading" class="page-header__title">{title}</h1>
        <div class="mw-parser-output">
          <aside class="portable-infobox">
            <div class="pi-data">
              <h3 class="pi-data-label">Classification</h3>
              <div class="pi-data-value">{classification}</div>
            </div>
          </aside>
          <p>{body}</p>
          <h2>Trivia</h2>
          <p>Some trivia.</p>
        </div>
        </body></html>"#
    )
}

fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

async fn mount_listing(
    mock_server: &MockServer,
    offset: &str,
    links: &[&str],
    next: Option<&str>,
) {
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("offset", offset))
        .respond_with(html_response(listing_html(links, next)))
        .expect(1)
        .mount(mock_server)
        .await;
}

async fn mount_detail(mock_server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html_response(body))
        .expect(1)
        .mount(mock_server)
        .await;
}

fn sorted_names(records: &[JutsuRecord]) -> Vec<String> {
    let mut names: Vec<String> = records.iter().map(|r| r.name.clone()).collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_full_crawl_two_listing_pages() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri());

    mount_listing(
        &mock_server,
        "0",
        &["/wiki/Rasengan", "/wiki/Chidori", "/wiki/Shadow_Clone_Technique"],
        Some("/wiki/Special:BrowseData/Jutsu?limit=250&offset=250"),
    )
    .await;
    // Chidori is listed on both pages
    mount_listing(
        &mock_server,
        "250",
        &["/wiki/Chidori", "/wiki/Amaterasu", "/wiki/Stub"],
        None,
    )
    .await;

    mount_detail(
        &mock_server,
        "/wiki/Rasengan",
        detail_html("Rasengan", "Ninjutsu", "A sphere of spinning chakra."),
    )
    .await;
    mount_detail(
        &mock_server,
        "/wiki/Chidori",
        detail_html("Chidori", "Ninjutsu", "Lightning in the hand."),
    )
    .await;
    mount_detail(
        &mock_server,
        "/wiki/Shadow_Clone_Technique",
        detail_html("Shadow Clone Technique", "Ninjutsu", "Creates solid clones."),
    )
    .await;
    mount_detail(
        &mock_server,
        "/wiki/Amaterasu",
        detail_html("Amaterasu", "Kekkei Genkai", "Black flames."),
    )
    .await;
    mount_detail(
        &mock_server,
        "/wiki/Stub",
        r#"<html><body><h1 id="firstHeading">Stub</h1><p>No article body</p></body></html>"#
            .to_string(),
    )
    .await;

    let coordinator = Coordinator::from_config(&config).expect("Failed to create coordinator");
    let mut sink = MemorySink::new();
    let stats = coordinator
        .run(seed_url(&config), &mut sink)
        .await
        .expect("Crawl failed");

    assert_eq!(stats.list_pages_fetched, 2);
    assert_eq!(stats.detail_pages_fetched, 5);
    assert_eq!(stats.detail_links_found, 6);
    assert_eq!(stats.duplicates_skipped, 1);
    assert_eq!(stats.pages_without_content, 1);
    assert_eq!(stats.fetch_failures, 0);
    assert_eq!(stats.records_emitted, 4);
    assert!(!stats.cancelled);

    let records = sink.into_records();
    assert_eq!(
        sorted_names(&records),
        vec!["Amaterasu", "Chidori", "Rasengan", "Shadow Clone Technique"]
    );

    let rasengan = records
        .iter()
        .find(|r| r.name == "Rasengan")
        .expect("Rasengan record missing");
    assert_eq!(rasengan.classification, "Ninjutsu");
    assert_eq!(rasengan.description, "A sphere of spinning chakra.");

    let amaterasu = records.iter().find(|r| r.name == "Amaterasu").unwrap();
    assert_eq!(amaterasu.classification, "Kekkei Genkai");

    // Each mock's expect(1) is verified when the server drops
}

#[tokio::test]
async fn test_requests_carry_configured_user_agent() {
    let mock_server = MockServer::start().await;
    let mut config = create_test_config(&mock_server.uri());
    config.http.user_agent = "Mozilla/5.0 (X11; Linux x86_64) Firefox/121.0".to_string();

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(header("user-agent", "Mozilla/5.0 (X11; Linux x86_64) Firefox/121.0"))
        .respond_with(html_response(listing_html(&["/wiki/Kamui"], None)))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wiki/Kamui"))
        .and(header("user-agent", "Mozilla/5.0 (X11; Linux x86_64) Firefox/121.0"))
        .respond_with(html_response(detail_html("Kamui", "Dōjutsu", "Space-time.")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let coordinator = Coordinator::from_config(&config).expect("Failed to create coordinator");
    let mut sink = MemorySink::new();
    let stats = coordinator
        .run(seed_url(&config), &mut sink)
        .await
        .expect("Crawl failed");

    assert_eq!(stats.fetch_failures, 0);
    assert_eq!(sink.records().len(), 1);
    assert_eq!(sink.records()[0].classification, "Dōjutsu");
}

#[tokio::test]
async fn test_failed_detail_pages_are_dropped() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri());

    mount_listing(
        &mock_server,
        "0",
        &["/wiki/Missing", "/wiki/Broken", "/wiki/Sharingan"],
        None,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/wiki/Missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wiki/Broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_detail(
        &mock_server,
        "/wiki/Sharingan",
        detail_html("Sharingan", "Kekkei Genkai", "A red eye."),
    )
    .await;

    let coordinator = Coordinator::from_config(&config).expect("Failed to create coordinator");
    let mut sink = MemorySink::new();
    let stats = coordinator
        .run(seed_url(&config), &mut sink)
        .await
        .expect("Crawl failed");

    // No retries: each failing page is requested exactly once
    assert_eq!(stats.fetch_failures, 2);
    assert_eq!(stats.detail_pages_fetched, 1);
    assert_eq!(sorted_names(sink.records()), vec!["Sharingan"]);
}

#[tokio::test]
async fn test_links_resolve_against_redirected_url() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let mut config = create_test_config(&base_url);
    config.crawler.seed_url = format!("{}/start", base_url);

    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header(
                    "location",
                    format!("{}{}?offset=0", base_url, "/wiki/Jutsu_list").as_str(),
                ),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    // Relative href: only correct when resolved against the redirect target
    Mock::given(method("GET"))
        .and(path("/wiki/Jutsu_list"))
        .respond_with(html_response(listing_html(&["Rasengan"], None)))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_detail(
        &mock_server,
        "/wiki/Rasengan",
        detail_html("Rasengan", "Ninjutsu", "A sphere of spinning chakra."),
    )
    .await;

    let coordinator = Coordinator::from_config(&config).expect("Failed to create coordinator");
    let mut sink = MemorySink::new();
    coordinator
        .run(seed_url(&config), &mut sink)
        .await
        .expect("Crawl failed");

    assert_eq!(sorted_names(sink.records()), vec!["Rasengan"]);
}

#[tokio::test]
async fn test_redirect_to_listed_page_is_fetched_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let config = create_test_config(&base_url);

    mount_listing(&mock_server, "0", &["/wiki/Chidori", "/wiki/Raikiri"], None).await;
    Mock::given(method("GET"))
        .and(path("/wiki/Raikiri"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/wiki/Chidori", base_url).as_str()),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_detail(
        &mock_server,
        "/wiki/Chidori",
        detail_html("Chidori", "Ninjutsu", "Lightning in the hand."),
    )
    .await;

    let coordinator = Coordinator::from_config(&config).expect("Failed to create coordinator");
    let mut sink = MemorySink::new();
    let stats = coordinator
        .run(seed_url(&config), &mut sink)
        .await
        .expect("Crawl failed");

    // mount_detail's expect(1) fails the test if Chidori is requested twice
    assert_eq!(stats.redirects, 1);
    assert_eq!(stats.records_emitted, 1);
    assert_eq!(sorted_names(sink.records()), vec!["Chidori"]);
}

#[tokio::test]
async fn test_run_crawl_writes_json_lines() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("jutsu.jsonl");

    let mut config = create_test_config(&mock_server.uri());
    config.output = OutputConfig {
        path: Some(output_path.to_string_lossy().into_owned()),
        format: OutputFormat::JsonLines,
    };

    mount_listing(&mock_server, "0", &["/wiki/Rasengan", "/wiki/Chidori"], None).await;
    mount_detail(
        &mock_server,
        "/wiki/Rasengan",
        detail_html("Rasengan", "Ninjutsu", "A sphere of spinning chakra."),
    )
    .await;
    mount_detail(
        &mock_server,
        "/wiki/Chidori",
        detail_html("Chidori", "Ninjutsu", "Lightning in the hand."),
    )
    .await;

    let stats = run_crawl(&config, CancellationToken::new())
        .await
        .expect("Crawl failed");
    assert_eq!(stats.records_emitted, 2);

    let content = std::fs::read_to_string(&output_path).expect("Output file missing");
    let lines: Vec<serde_json::Value> = content
        .lines()
        .map(|line| serde_json::from_str(line).expect("Invalid JSON line"))
        .collect();

    assert_eq!(lines.len(), 2);
    for line in &lines {
        let object = line.as_object().expect("Record is not an object");
        assert_eq!(object.len(), 3);
        assert!(object.contains_key("jutsu_name"));
        assert_eq!(object["jutsu_type"], "Ninjutsu");
        assert!(object.contains_key("jutsu_description"));
    }
}

#[tokio::test]
async fn test_cancellation_stops_crawl() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(
            html_response(listing_html(&["/wiki/Rasengan"], None))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let cancel = CancellationToken::new();
    let coordinator = Coordinator::from_config(&config)
        .expect("Failed to create coordinator")
        .with_cancel_token(cancel.clone());

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let mut sink = MemorySink::new();
    let started = std::time::Instant::now();
    let stats = coordinator
        .run(seed_url(&config), &mut sink)
        .await
        .expect("Crawl failed");

    assert!(stats.cancelled);
    assert!(started.elapsed() < Duration::from_secs(3));
    assert!(sink.records().is_empty());
    assert_eq!(stats.list_pages_fetched, 0);
}
