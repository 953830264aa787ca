//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end over real HTTP.

use site_mirror::crawler::{Coordinator, CrawlOptions, CrawlResult, HttpFetcher, StatusEvent, StatusUpdate};
use site_mirror::output::HtmlSaver;
use site_mirror::session::Session;
use site_mirror::state::CrawlConfig;
use site_mirror::storage::CheckpointStore;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts an HTML page that is only served to requests carrying the session cookie
async fn mount_page(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .and(header("cookie", "sid=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

async fn mount_three_page_site(server: &MockServer) {
    mount_page(
        server,
        "/",
        r#"<html><body><a href="/a">A</a><a href="b">B</a><a href="/logo.png">logo</a></body></html>"#,
    )
    .await;
    mount_page(
        server,
        "/a",
        r#"<html><body><a href="/b#part">B</a><a href="/">Home</a></body></html>"#,
    )
    .await;
    mount_page(
        server,
        "/b",
        r#"<html><body><a href="https://elsewhere.example/">out</a><a href="./a">A</a></body></html>"#,
    )
    .await;
}

fn fetcher(server: &MockServer) -> HttpFetcher {
    let session = Session::from_cookie_header("sid=abc", &server.uri()).unwrap();
    HttpFetcher::new(&session, "site-mirror-test/1.0").unwrap()
}

fn crawl_config(server: &MockServer) -> CrawlConfig {
    CrawlConfig::new(&format!("{}/", server.uri()), true, vec![], vec![], false).unwrap()
}

fn options(dir: &Path) -> CrawlOptions {
    CrawlOptions {
        delay: Duration::ZERO,
        timeout: Duration::from_secs(5),
        ..CrawlOptions::new(dir)
    }
}

async fn requested_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect()
}

#[tokio::test]
async fn test_full_crawl_with_session_cookie() {
    let server = MockServer::start().await;
    mount_three_page_site(&server).await;
    let dir = TempDir::new().unwrap();

    let result = Coordinator::new(crawl_config(&server), options(dir.path()), fetcher(&server), HtmlSaver)
        .run()
        .await
        .unwrap();

    assert_eq!(
        result,
        CrawlResult {
            saved_pages: 3,
            visited_pages: 3,
            failed_pages: 0
        }
    );
    assert_eq!(requested_paths(&server).await, vec!["/", "/a", "/b"]);

    let index = fs::read_to_string(dir.path().join("index.html")).unwrap();
    assert!(index.contains(r#"<a href="a.html">A</a>"#));
    assert!(index.contains(r#"<a href="b.html">B</a>"#));
    // Same-site links are rewritten even when they were not crawled
    assert!(index.contains(r#"<a href="logo.html">logo</a>"#));

    let a = fs::read_to_string(dir.path().join("a.html")).unwrap();
    assert!(a.contains(r#"href="b.html#part""#));
    assert!(a.contains(r#"href="index.html""#));

    let b = fs::read_to_string(dir.path().join("b.html")).unwrap();
    assert!(b.contains(r#"href="https://elsewhere.example/""#));
}

#[tokio::test]
async fn test_missing_cookie_is_failure() {
    let server = MockServer::start().await;
    mount_three_page_site(&server).await;
    let dir = TempDir::new().unwrap();

    let session = Session::from_cookie_header("sid=wrong", &server.uri()).unwrap();
    let fetcher = HttpFetcher::new(&session, "site-mirror-test/1.0").unwrap();

    let result = Coordinator::new(crawl_config(&server), options(dir.path()), fetcher, HtmlSaver)
        .run()
        .await
        .unwrap();

    assert_eq!(result.saved_pages, 0);
    assert_eq!(result.failed_pages, 1);
    assert!(!dir.path().join("index.html").exists());
}

#[tokio::test]
async fn test_http_errors_and_non_html_counted_as_failed() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<a href="/missing">404</a><a href="/api/data">json</a><a href="/ok">ok</a>"#,
    )
    .await;
    mount_page(&server, "/ok", "<p>fine</p>").await;
    Mock::given(method("GET"))
        .and(path("/api/data"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"a": 1}"#, "application/json"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink_events = Arc::clone(&events);

    let result = Coordinator::new(crawl_config(&server), options(dir.path()), fetcher(&server), HtmlSaver)
        .with_status(move |u: &StatusUpdate| {
            sink_events.lock().unwrap().push(u.event);
        })
        .run()
        .await
        .unwrap();

    assert_eq!(result.saved_pages, 2);
    assert_eq!(result.failed_pages, 2);
    assert_eq!(result.visited_pages, 4);
    assert!(dir.path().join("ok.html").exists());
    assert!(!dir.path().join("api/data.html").exists());
    assert_eq!(
        *events.lock().unwrap(),
        vec![
            StatusEvent::Visiting,
            StatusEvent::Saved,
            StatusEvent::Visiting,
            StatusEvent::Failed,
            StatusEvent::Visiting,
            StatusEvent::Failed,
            StatusEvent::Visiting,
            StatusEvent::Saved,
        ]
    );
}

#[tokio::test]
async fn test_links_resolved_against_redirect_target() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/old">old</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/docs/page"))
        .mount(&server)
        .await;
    mount_page(&server, "/docs/page", r#"<a href="child">child</a>"#).await;
    mount_page(&server, "/docs/child", "<p>leaf</p>").await;

    let dir = TempDir::new().unwrap();
    let result = Coordinator::new(crawl_config(&server), options(dir.path()), fetcher(&server), HtmlSaver)
        .run()
        .await
        .unwrap();

    assert_eq!(result.saved_pages, 3);
    assert!(dir.path().join("old.html").exists());
    assert!(dir.path().join("docs/child.html").exists());
    assert!(requested_paths(&server).await.contains(&"/docs/child".to_string()));
}

#[tokio::test]
async fn test_interrupted_crawl_resumes_over_http() {
    let server = MockServer::start().await;
    mount_three_page_site(&server).await;
    let dir = TempDir::new().unwrap();

    let first = CrawlOptions {
        max_pages: 2,
        resume: true,
        ..options(dir.path())
    };
    let store = CheckpointStore::new(&first.state_file);

    let partial = Coordinator::new(crawl_config(&server), first, fetcher(&server), HtmlSaver)
        .run()
        .await
        .unwrap();
    assert_eq!(partial.visited_pages, 2);

    let checkpoint = store.load().unwrap().expect("checkpoint left behind");
    assert!(!checkpoint.queue.is_empty());
    assert_eq!(checkpoint.saved, 2);

    let second = CrawlOptions {
        resume: true,
        ..options(dir.path())
    };
    let finished = Coordinator::new(crawl_config(&server), second, fetcher(&server), HtmlSaver)
        .run()
        .await
        .unwrap();

    assert_eq!(finished.saved_pages, 3);
    assert_eq!(finished.visited_pages, 3);
    assert!(!store.exists());
    // Each page was fetched exactly once across both runs
    assert_eq!(requested_paths(&server).await, vec!["/", "/a", "/b"]);
}

#[tokio::test]
async fn test_skip_existing_leaves_files_untouched() {
    let server = MockServer::start().await;
    mount_three_page_site(&server).await;
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.html"), "kept").unwrap();

    let config = CrawlConfig::new(&format!("{}/", server.uri()), true, vec![], vec![], true).unwrap();
    let result = Coordinator::new(config, options(dir.path()), fetcher(&server), HtmlSaver)
        .run()
        .await
        .unwrap();

    assert_eq!(result.saved_pages, 2);
    assert_eq!(result.visited_pages, 3);
    assert_eq!(fs::read_to_string(dir.path().join("a.html")).unwrap(), "kept");
    assert_eq!(requested_paths(&server).await, vec!["/", "/b"]);
}
