//! Fetch collaborators: given a URL, produce serialized page markup.

pub mod http;
pub mod webdriver;

use crate::config::{AnalyzerConfig, FetchMode};
use crate::error::FetchError;
use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

pub use http::HttpFetcher;
pub use webdriver::WebDriverFetcher;

/// Source of rendered page markup
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the markup of `url`
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;

    /// Release any session held by the fetcher
    async fn shutdown(&self) {}
}

/// Build the fetcher selected by the configuration
pub fn from_config(config: &AnalyzerConfig) -> Result<Arc<dyn Fetcher>, FetchError> {
    let fetcher: Arc<dyn Fetcher> = match config.fetch_mode {
        FetchMode::Browser => Arc::new(WebDriverFetcher::new(
            &config.webdriver_url,
            config.headless,
            config.fetch_timeout(),
        )),
        FetchMode::Plain => Arc::new(HttpFetcher::new(
            config.fetch_timeout(),
            config.user_agent.as_deref(),
        )?),
    };
    Ok(fetcher)
}

/// Fetch with the configured number of retries and linear backoff
pub async fn fetch_with_retry(
    fetcher: &dyn Fetcher,
    url: &Url,
    config: &AnalyzerConfig,
) -> Result<String, FetchError> {
    let mut attempt = 0;
    loop {
        match fetcher.fetch(url).await {
            Ok(html) => return Ok(html),
            Err(e) if attempt < config.fetch_retries => {
                attempt += 1;
                ::log::warn!(
                    "Fetch of {} failed ({}), retry {} of {}",
                    url,
                    e,
                    attempt,
                    config.fetch_retries
                );
                tokio::time::sleep(config.retry_backoff(attempt)).await;
            }
            Err(e) => return Err(e),
        }
    }
}
