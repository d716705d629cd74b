pub mod config;
pub mod crawlers;
pub mod error;
pub mod fetchers;
pub mod filter;
pub mod results;
pub mod semantics;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::{AnalyzerConfig, FetchMode};
pub use error::{Error, FetchError, Result};
pub use results::{CrawlNode, CrawlReport, CrawlStats, PageAnalysis};

use crawlers::CrawlLimits;
use fetchers::Fetcher;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Entry point for single-page analysis and bounded site crawls
pub struct Analyzer {
    config: AnalyzerConfig,
    fetcher: Arc<dyn Fetcher>,
    cancel: CancellationToken,
}

impl Analyzer {
    /// Create an analyzer using the fetcher selected by `config.fetch_mode`
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        let fetcher = fetchers::from_config(&config)?;
        Ok(Self {
            config,
            fetcher,
            cancel: CancellationToken::new(),
        })
    }

    /// Load configuration from a JSON file
    pub fn from_config_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Self::new(AnalyzerConfig::from_file(path)?)
    }

    /// Replace the fetch collaborator
    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Use a caller-owned cancellation token for crawls
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Token that cancels crawls started by this analyzer
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Fetch one page and extract its semantics. Fetch failures propagate.
    pub async fn analyze(&self, url: &str) -> Result<PageAnalysis> {
        let url = Url::parse(url)?;
        ::log::info!("Analyzing {}", url);

        let html = fetchers::fetch_with_retry(self.fetcher.as_ref(), &url, &self.config).await?;
        Ok(semantics::analyze_document(&html, &url))
    }

    /// Crawl from `url` with the configured depth and page bounds
    pub async fn crawl(&self, url: &str) -> Result<CrawlReport> {
        self.crawl_with_limits(url, self.config.max_depth, self.config.max_pages)
            .await
    }

    /// Crawl from `url`, visiting at most `max_pages` pages `max_depth` levels deep
    pub async fn crawl_with_limits(
        &self,
        url: &str,
        max_depth: usize,
        max_pages: usize,
    ) -> Result<CrawlReport> {
        crawlers::crawl(
            Arc::clone(&self.fetcher),
            &self.config,
            url,
            CrawlLimits {
                max_depth,
                max_pages,
            },
            self.cancel.clone(),
        )
        .await
    }

    /// Close the fetcher's browser session, if any
    pub async fn shutdown(&self) {
        self.fetcher.shutdown().await;
    }
}
