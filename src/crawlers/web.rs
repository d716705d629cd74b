use super::state::CrawlState;
use crate::config::AnalyzerConfig;
use crate::error::{FetchError, Result};
use crate::fetchers::Fetcher;
use crate::filter::{LinkFilter, normalize_url};
use crate::results::{CrawlNode, CrawlReport, PageAnalysis};
use crate::semantics;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Bounds of one traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlLimits {
    /// Levels to descend; 1 visits the start page only
    pub max_depth: usize,
    /// Maximum number of pages admitted
    pub max_pages: usize,
}

type VisitFuture<'a> = Pin<Box<dyn Future<Output = Option<CrawlNode>> + Send + 'a>>;

/// Depth-first traversal over one site, scoped to a single crawl.
///
/// Pages are fetched one at a time; the visited set, the per-domain rate
/// limiter and the counters live in the traversal's own `CrawlState`.
pub(crate) struct WebCrawler {
    fetcher: Arc<dyn Fetcher>,
    filter: LinkFilter,
    state: CrawlState,
    max_pages: usize,
    config: AnalyzerConfig,
    cancel: CancellationToken,
}

/// Crawl from `start_url` and return the tree of visited pages.
///
/// # Arguments
///
/// * `fetcher` - Source of page markup
/// * `config` - Rate limit, retry and exclude settings
/// * `start_url` - Traversal root; its host bounds the crawl
/// * `limits` - Depth and page-count bounds
/// * `cancel` - Stops admissions and abandons the in-flight fetch when cancelled
pub async fn crawl(
    fetcher: Arc<dyn Fetcher>,
    config: &AnalyzerConfig,
    start_url: &str,
    limits: CrawlLimits,
    cancel: CancellationToken,
) -> Result<CrawlReport> {
    let root_url = Url::parse(start_url)?;
    let filter = LinkFilter::new(&root_url, &config.exclude_patterns)?;

    ::log::info!(
        "Starting crawl of {} (max depth {}, max pages {})",
        root_url,
        limits.max_depth,
        limits.max_pages
    );

    let mut crawler = WebCrawler {
        fetcher,
        filter,
        state: CrawlState::new(config.rate_limit()),
        max_pages: limits.max_pages,
        config: config.clone(),
        cancel,
    };

    let root = crawler.visit(normalize_url(&root_url), limits.max_depth).await;
    let stats = crawler.state.stats();

    ::log::info!(
        "Crawl complete - visited {} pages ({} errors) in {:.2} seconds",
        stats.pages_visited,
        stats.errors,
        stats.elapsed_ms as f64 / 1000.0
    );

    Ok(CrawlReport { root, stats })
}

impl WebCrawler {
    /// Whether `url` may be visited at this depth
    fn admit(&self, url: &str, remaining_depth: usize) -> bool {
        if self.cancel.is_cancelled() {
            ::log::debug!("Crawl cancelled, not admitting {}", url);
            return false;
        }
        if remaining_depth == 0 {
            return false;
        }
        if self.state.visited_count() >= self.max_pages {
            ::log::debug!("Page cap of {} reached, skipping {}", self.max_pages, url);
            return false;
        }
        if self.state.is_visited(url) {
            ::log::trace!("Skipping already visited: {}", url);
            return false;
        }
        true
    }

    fn visit(&mut self, url: Url, remaining_depth: usize) -> VisitFuture<'_> {
        Box::pin(async move {
            let key = url.to_string();
            if !self.admit(&key, remaining_depth) {
                return None;
            }
            self.state.mark_visited(&key);
            ::log::debug!("Visiting {} (remaining depth {})", key, remaining_depth);

            let analysis = match self.fetch_page(&url).await {
                Ok(analysis) => analysis,
                Err(e) => {
                    ::log::warn!("Failed to process {}: {}", key, e);
                    self.state.record_error();
                    return Some(CrawlNode::failed(key, e));
                }
            };

            let mut node = CrawlNode::new(key, analysis.structure.title);

            for link in analysis.all_links {
                let Ok(resolved) = Url::parse(&link) else {
                    continue;
                };
                if !self.filter.should_follow_url(&resolved) {
                    ::log::debug!("Link filter rejected: {}", resolved);
                    continue;
                }

                let next = normalize_url(&resolved);
                if self.state.is_visited(next.as_str()) {
                    continue;
                }

                if let Some(child) = self.visit(next, remaining_depth - 1).await {
                    node.children.push(child);
                }
            }

            Some(node)
        })
    }

    /// Fetch and analyze one page, abandoning the fetch on cancellation
    async fn fetch_page(&mut self, url: &Url) -> std::result::Result<PageAnalysis, FetchError> {
        let cancel = self.cancel.clone();
        let html = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            result = self.fetch_with_retry(url) => result?,
        };

        let analysis = semantics::analyze_document(&html, url);
        ::log::info!("Found {} links in {}", analysis.all_links.len(), url);
        Ok(analysis)
    }

    /// Rate-limited fetch with bounded, linearly backed-off retries
    async fn fetch_with_retry(&mut self, url: &Url) -> std::result::Result<String, FetchError> {
        let mut attempt = 0;
        loop {
            self.state.throttle(url).await;
            match self.fetcher.fetch(url).await {
                Ok(html) => return Ok(html),
                Err(e) if attempt < self.config.fetch_retries => {
                    attempt += 1;
                    let delay = self.config.retry_backoff(attempt);
                    ::log::warn!(
                        "Fetch of {} failed ({}), retry {} of {} in {} ms",
                        url,
                        e,
                        attempt,
                        self.config.fetch_retries,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
