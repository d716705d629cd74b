use super::Fetcher;
use crate::error::FetchError;
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::timeout;
use url::Url;

/// Common WebDriver endpoints tried when the configured one is unreachable
const FALLBACK_WEBDRIVER_URLS: [&str; 4] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444",
];

/// Browser-automation fetch over WebDriver.
///
/// The session is created on first use and dropped when the browser reports
/// it lost, so the next fetch reconnects.
pub struct WebDriverFetcher {
    webdriver_url: String,
    headless: bool,
    timeout: Duration,
    client: Mutex<Option<Client>>,
}

impl WebDriverFetcher {
    pub fn new(webdriver_url: &str, headless: bool, timeout: Duration) -> Self {
        Self {
            webdriver_url: webdriver_url.to_string(),
            headless,
            timeout,
            client: Mutex::new(None),
        }
    }

    fn capabilities(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut caps = serde_json::Map::new();
        if self.headless {
            caps.insert(
                "goog:chromeOptions".to_string(),
                json!({ "args": ["--headless", "--disable-gpu", "--no-sandbox"] }),
            );
        }
        caps
    }

    /// Connect to the configured WebDriver, then to the common fallbacks
    async fn connect(&self) -> Result<Client, FetchError> {
        let first_error = match ClientBuilder::native()
            .capabilities(self.capabilities())
            .connect(&self.webdriver_url)
            .await
        {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", self.webdriver_url);
                return Ok(client);
            }
            Err(e) => {
                ::log::error!(
                    "Failed to connect to WebDriver at {}: {}",
                    self.webdriver_url,
                    e
                );
                e.to_string()
            }
        };

        for url in FALLBACK_WEBDRIVER_URLS {
            if url == self.webdriver_url {
                continue;
            }
            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = ClientBuilder::native()
                .capabilities(self.capabilities())
                .connect(url)
                .await
            {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(client);
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(FetchError::Connect(first_error))
    }

    async fn load_page(&self, client: &Client, url: &Url) -> Result<String, FetchError> {
        let navigation_error = |e: fantoccini::error::CmdError| FetchError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        };

        client.goto(url.as_str()).await.map_err(navigation_error)?;
        client
            .wait()
            .at_most(self.timeout)
            .for_element(Locator::Css("body"))
            .await
            .map_err(navigation_error)?;
        client.source().await.map_err(navigation_error)
    }
}

#[async_trait]
impl Fetcher for WebDriverFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let mut session = self.client.lock().await;
        let client = match session.as_ref() {
            Some(client) => client.clone(),
            None => {
                let client = self.connect().await?;
                *session = Some(client.clone());
                client
            }
        };

        let started = std::time::Instant::now();
        let result = match timeout(self.timeout, self.load_page(&client, url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                url: url.to_string(),
                secs: self.timeout.as_secs(),
            }),
        };

        match &result {
            Ok(_) => ::log::debug!(
                "Loaded {} in {:.2} seconds",
                url,
                started.elapsed().as_secs_f64()
            ),
            Err(e) if e.is_lost_session() => {
                ::log::warn!("Lost WebDriver session while loading {}", url);
                *session = None;
            }
            Err(e) => ::log::error!("Failed to load {}: {}", url, e),
        }

        result
    }

    async fn shutdown(&self) {
        if let Some(client) = self.client.lock().await.take() {
            if let Err(e) = client.close().await {
                ::log::warn!("Failed to close WebDriver client: {}", e);
            }
        }
    }
}
