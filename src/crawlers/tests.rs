use super::web::{CrawlLimits, crawl};
use crate::config::AnalyzerConfig;
use crate::error::{Error, FetchError};
use crate::fetchers::Fetcher;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

const ROOT: &str = "https://site.test/";

/// In-memory site: URL -> markup. Unknown URLs fail with 404.
struct SiteFixture {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl SiteFixture {
    fn new(pages: Vec<(&str, String)>) -> Arc<Self> {
        Arc::new(Self {
            pages: pages
                .into_iter()
                .map(|(url, html)| (url.to_string(), html))
                .collect(),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for SiteFixture {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}

/// Fails the first `failures` fetches, then serves a fixed page
struct FlakyFetcher {
    failures: usize,
    calls: AtomicUsize,
}

#[async_trait]
impl Fetcher for FlakyFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            Err(FetchError::Timeout {
                url: url.to_string(),
                secs: 1,
            })
        } else {
            Ok("<title>Recovered</title>".to_string())
        }
    }
}

/// Serves the root page, then cancels the crawl during the second fetch and stalls
struct CancelOnSecondFetch {
    cancel: CancellationToken,
    calls: AtomicUsize,
}

#[async_trait]
impl Fetcher for CancelOnSecondFetch {
    async fn fetch(&self, _url: &Url) -> Result<String, FetchError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call == 0 {
            return Ok(page("A", &["/b", "/c"]));
        }
        self.cancel.cancel();
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(page("Late", &[]))
    }
}

fn page(title: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{href}">{href}</a>"#))
        .collect();
    format!("<html><head><title>{title}</title></head><body>{anchors}</body></html>")
}

fn config() -> AnalyzerConfig {
    AnalyzerConfig {
        rate_limit_ms: 0,
        ..AnalyzerConfig::default()
    }
}

fn limits(max_depth: usize, max_pages: usize) -> CrawlLimits {
    CrawlLimits {
        max_depth,
        max_pages,
    }
}

/// a -> b, c ; b -> c, a ; c -> d ; d -> (none)
fn small_site() -> Arc<SiteFixture> {
    SiteFixture::new(vec![
        (ROOT, page("A", &["/b", "/c"])),
        ("https://site.test/b", page("B", &["/c", "/"])),
        ("https://site.test/c", page("C", &["/d"])),
        ("https://site.test/d", page("D", &[])),
    ])
}

#[tokio::test]
async fn test_depth_zero_yields_nothing() {
    let site = small_site();
    let report = crawl(site.clone(), &config(), ROOT, limits(0, 10), CancellationToken::new())
        .await
        .unwrap();
    assert!(report.root.is_none());
    assert_eq!(report.stats.pages_visited, 0);
    assert!(site.requests().is_empty());
}

#[tokio::test]
async fn test_depth_one_has_no_children() {
    let site = small_site();
    let report = crawl(site.clone(), &config(), ROOT, limits(1, 10), CancellationToken::new())
        .await
        .unwrap();
    let root = report.root.unwrap();
    assert_eq!(root.url, ROOT);
    assert_eq!(root.title.as_deref(), Some("A"));
    assert!(root.children.is_empty());
    assert_eq!(site.requests(), vec![ROOT]);
}

#[tokio::test]
async fn test_first_encounter_wins() {
    let site = small_site();
    let report = crawl(site.clone(), &config(), ROOT, limits(3, 10), CancellationToken::new())
        .await
        .unwrap();
    let root = report.root.unwrap();

    // c is reached through b first, so it is not repeated under a
    assert_eq!(
        root.urls(),
        vec![ROOT, "https://site.test/b", "https://site.test/c"]
    );
    assert_eq!(root.children.len(), 1);
    assert_eq!(root.children[0].children[0].title.as_deref(), Some("C"));
    // d would need a fourth level
    assert!(root.children[0].children[0].children.is_empty());
    assert_eq!(report.stats.pages_visited, 3);
}

#[tokio::test]
async fn test_page_cap() {
    let site = small_site();
    for max_pages in 0..5 {
        let report = crawl(
            site.clone(),
            &config(),
            ROOT,
            limits(10, max_pages),
            CancellationToken::new(),
        )
        .await
        .unwrap();
        assert!(report.stats.pages_visited <= max_pages);
        let count = report.root.map(|r| r.page_count()).unwrap_or(0);
        assert_eq!(count, report.stats.pages_visited);
    }
}

#[tokio::test]
async fn test_fetch_failure_is_local() {
    let site = SiteFixture::new(vec![
        (ROOT, page("A", &["/missing", "/ok"])),
        ("https://site.test/ok", page("OK", &[])),
    ]);
    let report = crawl(site, &config(), ROOT, limits(3, 10), CancellationToken::new())
        .await
        .unwrap();
    let root = report.root.unwrap();

    assert_eq!(root.children.len(), 2);
    let missing = &root.children[0];
    assert_eq!(missing.url, "https://site.test/missing");
    assert!(missing.error.as_deref().unwrap().contains("404"));
    assert!(missing.children.is_empty());
    assert!(root.children[1].error.is_none());
    assert_eq!(report.stats.errors, 1);
}

#[tokio::test]
async fn test_failed_start_page() {
    let site = SiteFixture::new(vec![]);
    let report = crawl(site, &config(), ROOT, limits(3, 10), CancellationToken::new())
        .await
        .unwrap();
    let root = report.root.unwrap();
    assert!(root.error.is_some());
    assert!(root.children.is_empty());
}

#[tokio::test]
async fn test_same_origin_and_filtering() {
    let site = SiteFixture::new(vec![
        (
            ROOT,
            page(
                "A",
                &[
                    "https://other.test/",
                    "https://sub.site.test/",
                    "/report.pdf",
                    "mailto:team@site.test",
                    "/inside",
                ],
            ),
        ),
        ("https://site.test/inside", page("Inside", &[])),
    ]);
    let report = crawl(site.clone(), &config(), ROOT, limits(3, 10), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(site.requests(), vec![ROOT, "https://site.test/inside"]);
    assert_eq!(report.root.unwrap().children.len(), 1);
}

#[tokio::test]
async fn test_fragments_are_deduplicated() {
    let site = SiteFixture::new(vec![
        (ROOT, page("A", &["/b#one", "/b#two", "#top"])),
        ("https://site.test/b", page("B", &[])),
    ]);
    let report = crawl(site.clone(), &config(), ROOT, limits(3, 10), CancellationToken::new())
        .await
        .unwrap();
    let root = report.root.unwrap();
    assert_eq!(root.urls(), vec![ROOT, "https://site.test/b"]);
    assert_eq!(site.requests().len(), 2);
}

#[tokio::test]
async fn test_crawl_is_repeatable() {
    let site = small_site();
    let first = crawl(site.clone(), &config(), ROOT, limits(4, 10), CancellationToken::new())
        .await
        .unwrap();
    let second = crawl(site, &config(), ROOT, limits(4, 10), CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(first.root, second.root);
}

#[tokio::test]
async fn test_invalid_start_url() {
    let site = small_site();
    let err = crawl(site, &config(), "not a url", limits(2, 10), CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidUrl(_)));
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let site = small_site();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let report = crawl(site.clone(), &config(), ROOT, limits(3, 10), cancel)
        .await
        .unwrap();
    assert!(report.root.is_none());
    assert!(site.requests().is_empty());
}

#[tokio::test]
async fn test_retries_recover_from_transient_failures() {
    let fetcher = Arc::new(FlakyFetcher {
        failures: 2,
        calls: AtomicUsize::new(0),
    });
    let config = AnalyzerConfig {
        rate_limit_ms: 0,
        fetch_retries: 2,
        retry_backoff_ms: 0,
        ..AnalyzerConfig::default()
    };
    let report = crawl(fetcher.clone(), &config, ROOT, limits(1, 10), CancellationToken::new())
        .await
        .unwrap();
    let root = report.root.unwrap();
    assert!(root.error.is_none());
    assert_eq!(root.title.as_deref(), Some("Recovered"));
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let fetcher = Arc::new(FlakyFetcher {
        failures: 5,
        calls: AtomicUsize::new(0),
    });
    let config = AnalyzerConfig {
        rate_limit_ms: 0,
        fetch_retries: 1,
        retry_backoff_ms: 0,
        ..AnalyzerConfig::default()
    };
    let report = crawl(fetcher.clone(), &config, ROOT, limits(1, 10), CancellationToken::new())
        .await
        .unwrap();
    assert!(report.root.unwrap().error.unwrap().contains("timed out"));
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_requests_to_one_domain_are_paced() {
    let site = small_site();
    let config = AnalyzerConfig {
        rate_limit_ms: 1000,
        ..AnalyzerConfig::default()
    };
    let start = tokio::time::Instant::now();
    let report = crawl(site, &config, ROOT, limits(3, 10), CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(report.stats.pages_visited, 3);
    // three fetches, two enforced gaps
    assert!(start.elapsed() >= Duration::from_millis(2000));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_abandons_in_flight_fetch() {
    let cancel = CancellationToken::new();
    let fetcher = Arc::new(CancelOnSecondFetch {
        cancel: cancel.clone(),
        calls: AtomicUsize::new(0),
    });
    let report = crawl(fetcher.clone(), &config(), ROOT, limits(3, 10), cancel)
        .await
        .unwrap();
    let root = report.root.unwrap();

    assert_eq!(root.title.as_deref(), Some("A"));
    assert_eq!(root.children.len(), 1);
    assert_eq!(root.children[0].url, "https://site.test/b");
    assert_eq!(root.children[0].error.as_deref(), Some("crawl cancelled"));
    assert!(root.children[0].children.is_empty());
    // /c is never admitted
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    assert_eq!(report.stats.pages_visited, 2);
    assert_eq!(report.stats.errors, 1);
}

#[tokio::test(start_paused = true)]
async fn test_retry_backoff_grows_per_attempt() {
    let fetcher = Arc::new(FlakyFetcher {
        failures: 2,
        calls: AtomicUsize::new(0),
    });
    let config = AnalyzerConfig {
        rate_limit_ms: 0,
        fetch_retries: 2,
        retry_backoff_ms: 300,
        ..AnalyzerConfig::default()
    };
    let start = tokio::time::Instant::now();
    let report = crawl(fetcher.clone(), &config, ROOT, limits(1, 10), CancellationToken::new())
        .await
        .unwrap();
    assert!(report.root.unwrap().error.is_none());
    // 300 ms before the first retry, 600 ms before the second
    assert!(start.elapsed() >= Duration::from_millis(900));
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 3);
}
