use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// How page markup is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// Drive a real browser through WebDriver so client-side script runs
    #[default]
    Browser,
    /// Plain HTTP GET, no script execution
    Plain,
}

/// Configuration for page analysis and crawling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Fetch collaborator to use
    #[serde(default)]
    pub fetch_mode: FetchMode,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Page-load timeout in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Minimum milliseconds between two requests to the same domain
    #[serde(default = "default_rate_limit_ms")]
    pub rate_limit_ms: u64,

    /// Maximum crawl depth (1 = only the start page)
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum number of pages visited by one crawl
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Extra attempts after a failed fetch
    #[serde(default)]
    pub fetch_retries: u32,

    /// Backoff step between retries, multiplied by the attempt number
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Regex patterns for links that must not be followed
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// User agent sent by the plain fetcher
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_rate_limit_ms() -> u64 {
    1000
}

fn default_max_depth() -> usize {
    2
}

fn default_max_pages() -> usize {
    50
}

fn default_retry_backoff_ms() -> u64 {
    500
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fetch_mode: FetchMode::default(),
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            rate_limit_ms: default_rate_limit_ms(),
            max_depth: default_max_depth(),
            max_pages: default_max_pages(),
            fetch_retries: 0,
            retry_backoff_ms: default_retry_backoff_ms(),
            exclude_patterns: Vec::new(),
            user_agent: None,
        }
    }
}

impl AnalyzerConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        config.apply_env();
        Ok(config)
    }

    /// Override the WebDriver URL with `WEBDRIVER_URL` if it is set
    pub fn apply_env(&mut self) {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn rate_limit(&self) -> Duration {
        Duration::from_millis(self.rate_limit_ms)
    }

    /// Delay before retry number `attempt` (1-based)
    pub fn retry_backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(u64::from(attempt)))
    }
}
