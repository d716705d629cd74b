use thiserror::Error;

/// Errors produced by a fetch collaborator
#[derive(Debug, Error)]
pub enum FetchError {
    /// The page did not load (or never produced a body) within the timeout
    #[error("timed out after {secs}s fetching {url}")]
    Timeout { url: String, secs: u64 },

    /// No WebDriver session could be created
    #[error("could not connect to WebDriver: {0}")]
    Connect(String),

    /// The browser failed to navigate to the page or return its source
    #[error("failed to load {url}: {message}")]
    Navigation { url: String, message: String },

    /// Transport error from the plain HTTP fetcher
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The crawl was cancelled while the fetch was in flight
    #[error("crawl cancelled")]
    Cancelled,
}

impl FetchError {
    /// Whether the WebDriver session backing this request is gone
    pub fn is_lost_session(&self) -> bool {
        match self {
            FetchError::Navigation { message, .. } => {
                message.contains("Unable to find session") || message.contains("invalid session id")
            }
            _ => false,
        }
    }
}

/// Crate-level error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid exclude pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
