//! Integration tests for sessions and the HTTP fetcher

use site_mirror::crawler::{FetchError, Fetcher, HttpFetcher};
use site_mirror::session::Session;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

fn storage_state(host: &str) -> String {
    format!(
        r#"{{
            "cookies": [
                {{
                    "name": "sid",
                    "value": "abc",
                    "domain": "{}",
                    "path": "/",
                    "expires": -1,
                    "httpOnly": true,
                    "secure": false,
                    "sameSite": "Lax"
                }}
            ],
            "origins": []
        }}"#,
        host
    )
}

#[tokio::test]
async fn test_session_file_cookies_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/private"))
        .and(header("cookie", "sid=abc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"<a href="next">n</a><a href="/up">u</a>"#, "text/html"),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let auth_file = dir.path().join("auth.json");
    fs::write(&auth_file, storage_state("127.0.0.1")).unwrap();

    let session = Session::load(&auth_file).unwrap();
    let fetcher = HttpFetcher::new(&session, "site-mirror-test/1.0").unwrap();
    let page = fetcher
        .fetch(&format!("{}/private", server.uri()), TIMEOUT)
        .await
        .unwrap();

    assert!(page.html.contains("next"));
    assert_eq!(
        page.links,
        vec![format!("{}/next", server.uri()), format!("{}/up", server.uri())]
    );
}

#[tokio::test]
async fn test_status_error() {
    let server = MockServer::start().await;
    let session = Session::from_cookie_header("sid=abc", &server.uri()).unwrap();
    let fetcher = HttpFetcher::new(&session, "site-mirror-test/1.0").unwrap();

    let url = format!("{}/nowhere", server.uri());
    let error = fetcher.fetch(&url, TIMEOUT).await.unwrap_err();
    assert_eq!(error, FetchError::Status { url, status: 404 });
}

#[tokio::test]
async fn test_content_mismatch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/report"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("%PDF-1.4", "application/pdf"))
        .mount(&server)
        .await;

    let session = Session::from_cookie_header("sid=abc", &server.uri()).unwrap();
    let fetcher = HttpFetcher::new(&session, "site-mirror-test/1.0").unwrap();

    let error = fetcher
        .fetch(&format!("{}/report", server.uri()), TIMEOUT)
        .await
        .unwrap_err();
    assert!(matches!(error, FetchError::ContentMismatch { ref content_type, .. } if content_type == "application/pdf"));
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<p>late</p>", "text/html")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let session = Session::from_cookie_header("sid=abc", &server.uri()).unwrap();
    let fetcher = HttpFetcher::new(&session, "site-mirror-test/1.0").unwrap();

    let error = fetcher
        .fetch(&format!("{}/slow", server.uri()), Duration::from_millis(200))
        .await
        .unwrap_err();
    assert!(matches!(error, FetchError::Timeout { .. }));
}

#[tokio::test]
async fn test_imported_session_merged_with_header() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let import = dir.path().join("export.json");
    fs::write(&import, storage_state("127.0.0.1")).unwrap();

    let mut session = Session::load(&import).unwrap();
    session.merge(Session::from_cookie_header("sid=fresh; lang=en", &server.uri()).unwrap());

    let saved = dir.path().join("auth.json");
    session.save(&saved).unwrap();
    let reloaded = Session::load(&saved).unwrap();

    let values: Vec<(&str, &str)> = reloaded
        .cookies
        .iter()
        .map(|c| (c.name.as_str(), c.value.as_str()))
        .collect();
    assert_eq!(values, vec![("sid", "fresh"), ("lang", "en")]);
}
