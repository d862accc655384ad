//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! crawl cycle end-to-end with the built-in HTTP renderer. A small in-test
//! detector stands in for the fingerprinting engine.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use techcrawl::detector::{CategoryCatalog, Detection, DetectionBatch, Detector, DetectorError};
use techcrawl::render::HttpRenderer;
use techcrawl::{CrawlOptions, Driver, PageSignals};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Detects a couple of technologies from headers and scripts, and records
/// every page it was asked about
#[derive(Default)]
struct RecordingDetector {
    calls: Mutex<Vec<(String, String, PageSignals)>>,
}

impl RecordingDetector {
    fn urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = self
            .calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, url, _)| url.clone())
            .collect();
        urls.sort();
        urls
    }

    fn signals_for(&self, url: &str) -> Option<PageSignals> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|(_, u, _)| u == url)
            .map(|(_, _, signals)| signals.clone())
    }
}

#[async_trait]
impl Detector for RecordingDetector {
    async fn detect(
        &self,
        host: &str,
        url: &str,
        signals: &PageSignals,
    ) -> Result<DetectionBatch, DetectorError> {
        self.calls
            .lock()
            .unwrap()
            .push((host.to_string(), url.to_string(), signals.clone()));

        let mut applications = Vec::new();
        if let Some(server) = signals.headers.get("server") {
            if server.iter().any(|s| s.starts_with("nginx")) {
                applications.push(Detection {
                    name: "Nginx".to_string(),
                    confidence: 100.0,
                    version: server[0].strip_prefix("nginx/").map(str::to_string),
                    icon: Some("Nginx.svg".to_string()),
                    website: Some("https://nginx.org".to_string()),
                    categories: vec![22],
                });
            }
        }
        if signals.scripts.iter().any(|s| s.contains("jquery")) {
            applications.push(Detection {
                name: "jQuery".to_string(),
                confidence: 100.0,
                version: None,
                icon: None,
                website: None,
                categories: vec![59],
            });
        }

        Ok(DetectionBatch {
            applications,
            meta: serde_json::json!({ "language": "en" }),
        })
    }
}

fn catalog() -> Arc<CategoryCatalog> {
    Arc::new(
        CategoryCatalog::from_json(
            r#"{"categories": {"22": {"name": "Web servers"}, "59": {"name": "JavaScript libraries"}}}"#,
        )
        .unwrap(),
    )
}

fn test_options(recursive: bool) -> CrawlOptions {
    CrawlOptions {
        recursive,
        delay_ms: 10,
        max_depth: 3,
        max_urls: 10,
        max_wait_ms: 2000,
        request_timeout_ms: 2000,
        user_agent: "TestBot/1.0".to_string(),
        ..CrawlOptions::default()
    }
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><head></head><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
        .insert_header("server", "nginx/1.25.3")
}

fn build_driver(
    seed: &str,
    options: CrawlOptions,
    detector: Arc<RecordingDetector>,
) -> Driver {
    let renderer = HttpRenderer::new(&options.user_agent, options.request_timeout()).unwrap();
    Driver::new(seed, options, Arc::new(renderer), detector, catalog()).unwrap()
}

#[tokio::test]
async fn test_full_crawl_single_host() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<script src="/js/jquery-3.7.1.min.js"></script>
            <a href="/page1">Page 1</a>
            <a href="/page2">Page 2</a>
            <a href="https://external.example.org/">External</a>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(html_page(
            r#"<a href="/page2">Page 2 again</a><a href="/#top">Home</a>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(html_page("<p>Leaf</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let detector = Arc::new(RecordingDetector::default());
    let driver = build_driver(
        &format!("{}/", base_url),
        test_options(true),
        detector.clone(),
    );

    let result = driver.analyze().await;

    let mut visited = driver.visited_urls();
    visited.sort();
    assert_eq!(
        visited,
        vec![
            format!("{}/", base_url),
            format!("{}/page1", base_url),
            format!("{}/page2", base_url),
        ]
    );
    assert_eq!(detector.urls(), visited);

    let names: Vec<&str> = result.applications.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names.iter().filter(|n| **n == "Nginx").count(), 1);
    assert!(names.contains(&"jQuery"));

    let nginx = result
        .applications
        .iter()
        .find(|a| a.name == "Nginx")
        .unwrap();
    assert_eq!(nginx.confidence, "100");
    assert_eq!(nginx.version.as_deref(), Some("1.25.3"));
    assert_eq!(nginx.categories[0].name, "Web servers");

    let jquery = result
        .applications
        .iter()
        .find(|a| a.name == "jQuery")
        .unwrap();
    assert_eq!(jquery.icon, "default.svg");

    assert_eq!(result.meta, serde_json::json!({ "language": "en" }));
}

#[tokio::test]
async fn test_non_recursive_fetches_only_seed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/next">Next</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(html_page("<p>Never</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let detector = Arc::new(RecordingDetector::default());
    let driver = build_driver(
        &format!("{}/", base_url),
        test_options(false),
        detector.clone(),
    );

    driver.analyze().await;
    assert_eq!(driver.visited_urls(), vec![format!("{}/", base_url)]);
}

#[tokio::test]
async fn test_page_budget_limits_fetches() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let links: String = (1..=5)
        .map(|i| format!(r#"<a href="/p{}">{}</a>"#, i, i))
        .collect();
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&links))
        .mount(&mock_server)
        .await;

    let options = CrawlOptions {
        max_urls: 1,
        ..test_options(true)
    };
    let detector = Arc::new(RecordingDetector::default());
    let driver = build_driver(&format!("{}/", base_url), options, detector.clone());

    driver.analyze().await;

    assert_eq!(driver.visited_urls().len(), 1);
    let requests = mock_server.received_requests().await.unwrap();
    let page_requests = requests
        .iter()
        .filter(|r| r.url.path() != "/robots.txt")
        .count();
    assert_eq!(page_requests, 1);
}

#[tokio::test]
async fn test_robots_txt_is_passed_as_signal() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /admin"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page("<p>Hello</p>"))
        .mount(&mock_server)
        .await;

    let detector = Arc::new(RecordingDetector::default());
    let seed = format!("{}/", base_url);
    let driver = build_driver(&seed, test_options(false), detector.clone());

    driver.analyze().await;

    let signals = detector.signals_for(&seed).unwrap();
    assert_eq!(
        signals.robots_txt.as_deref(),
        Some("User-agent: *\nDisallow: /admin")
    );
    assert_eq!(signals.headers["server"], vec!["nginx/1.25.3"]);
    assert!(signals.html.contains("<p>Hello</p>"));
}

#[tokio::test]
async fn test_missing_robots_txt_is_omitted() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page("<p>Hello</p>"))
        .mount(&mock_server)
        .await;

    let detector = Arc::new(RecordingDetector::default());
    let seed = format!("{}/", base_url);
    let driver = build_driver(&seed, test_options(false), detector.clone());

    driver.analyze().await;

    let signals = detector.signals_for(&seed).unwrap();
    assert!(signals.robots_txt.is_none());
}

#[tokio::test]
async fn test_fragment_links_are_not_refetched() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r##"<a href="#main">Skip</a><a href="/#footer">Footer</a><a href="/about#team">Team</a>"##,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html_page(r#"<a href="/about">Self</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let detector = Arc::new(RecordingDetector::default());
    let driver = build_driver(
        &format!("{}/", base_url),
        test_options(true),
        detector.clone(),
    );

    driver.analyze().await;

    let mut visited = driver.visited_urls();
    visited.sort();
    assert_eq!(
        visited,
        vec![format!("{}/", base_url), format!("{}/about", base_url)]
    );
}

#[tokio::test]
async fn test_slow_response_within_request_timeout() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page("<p>Slow</p>").set_delay(Duration::from_millis(300)))
        .mount(&mock_server)
        .await;

    let options = CrawlOptions {
        max_wait_ms: 50,
        ..test_options(false)
    };
    let detector = Arc::new(RecordingDetector::default());
    let seed = format!("{}/", base_url);
    let driver = build_driver(&seed, options, detector.clone());

    let result = driver.analyze().await;

    // The response is late but inside the request timeout
    assert!(detector.signals_for(&seed).is_some());
    assert!(result.applications.iter().any(|a| a.name == "Nginx"));
}

/// Serves pages whose headers arrive but whose body never completes;
/// robots.txt answers 404
async fn stalled_body_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                let mut request = [0u8; 2048];
                let n = socket.read(&mut request).await.unwrap_or(0);
                let head = String::from_utf8_lossy(&request[..n]).into_owned();

                if head.starts_with("GET /robots.txt") {
                    let _ = socket
                        .write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n")
                        .await;
                    return;
                }

                let _ = socket
                    .write_all(
                        b"HTTP/1.1 200 OK\r\n\
                          Server: nginx/1.25.3\r\n\
                          Content-Type: text/html\r\n\
                          Transfer-Encoding: chunked\r\n\r\n\
                          1c\r\n<html><body><a href=\"/next\">\r\n",
                    )
                    .await;
                let _ = socket.flush().await;
                tokio::time::sleep(Duration::from_secs(10)).await;
            });
        }
    });

    format!("http://{}/", addr)
}

#[tokio::test]
async fn test_stalled_body_yields_partial_signals() {
    let seed = stalled_body_server().await;
    let options = CrawlOptions {
        max_wait_ms: 200,
        ..test_options(true)
    };
    let detector = Arc::new(RecordingDetector::default());
    let driver = build_driver(&seed, options, detector.clone());

    let result = driver.analyze().await;

    let signals = detector.signals_for(&seed).unwrap();
    assert_eq!(signals.html, "");
    assert_eq!(signals.headers["server"], vec!["nginx/1.25.3"]);
    assert!(signals.robots_txt.is_none());

    // No body, so no links were followed
    assert_eq!(driver.visited_urls(), vec![seed.clone()]);
    assert!(result.applications.iter().any(|a| a.name == "Nginx"));
}

#[tokio::test]
async fn test_unreachable_seed_returns_empty_result() {
    let detector = Arc::new(RecordingDetector::default());
    let options = CrawlOptions {
        request_timeout_ms: 500,
        ..test_options(true)
    };
    let driver = build_driver("http://127.0.0.1:9/", options, detector.clone());

    let result = driver.analyze().await;

    assert!(result.applications.is_empty());
    assert_eq!(result.meta, serde_json::json!({}));
    assert!(detector.urls().is_empty());
    assert_eq!(driver.visited_urls(), vec!["http://127.0.0.1:9/"]);
}
