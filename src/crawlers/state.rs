use crate::results::CrawlStats;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

/// Per-domain pacing: two requests to the same domain are at least
/// `min_interval` apart. Domains never wait on each other.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    min_interval: Duration,
    last_request_time: HashMap<String, Instant>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request_time: HashMap::new(),
        }
    }

    /// Time left before `domain` may be requested again, if any
    pub fn time_until_next_request(&self, domain: &str, now: Instant) -> Option<Duration> {
        let last = self.last_request_time.get(domain)?;
        let elapsed = now.saturating_duration_since(*last);
        if elapsed < self.min_interval {
            Some(self.min_interval - elapsed)
        } else {
            None
        }
    }

    /// Wait out the domain's cooldown, then stamp it with the current time
    pub async fn acquire(&mut self, domain: &str) {
        if let Some(wait) = self.time_until_next_request(domain, Instant::now()) {
            ::log::debug!("Rate limiting {}: waiting {} ms", domain, wait.as_millis());
            tokio::time::sleep(wait).await;
        }
        self.last_request_time
            .insert(domain.to_string(), Instant::now());
    }
}

/// Shared state of a single traversal
#[derive(Debug)]
pub struct CrawlState {
    visited: HashSet<String>,
    rate_limiter: RateLimiter,
    errors: usize,
    start_time: Instant,
}

impl CrawlState {
    pub fn new(rate_limit: Duration) -> Self {
        Self {
            visited: HashSet::new(),
            rate_limiter: RateLimiter::new(rate_limit),
            errors: 0,
            start_time: Instant::now(),
        }
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Marks a URL as visited; false if it already was
    pub fn mark_visited(&mut self, url: &str) -> bool {
        if self.visited.contains(url) {
            return false;
        }
        self.visited.insert(url.to_string())
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn record_error(&mut self) {
        self.errors += 1;
    }

    /// Apply the rate limit for the URL's domain
    pub async fn throttle(&mut self, url: &Url) {
        let domain = url.host_str().unwrap_or_default().to_string();
        self.rate_limiter.acquire(&domain).await;
    }

    pub fn stats(&self) -> CrawlStats {
        CrawlStats {
            pages_visited: self.visited.len(),
            errors: self.errors,
            elapsed_ms: self.start_time.elapsed().as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_same_domain_waits_for_interval() {
        let mut limiter = RateLimiter::new(Duration::from_millis(500));
        let start = Instant::now();

        limiter.acquire("example.com").await;
        assert_eq!(start.elapsed(), Duration::ZERO);

        limiter.acquire("example.com").await;
        assert!(start.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_domains_do_not_block_each_other() {
        let mut limiter = RateLimiter::new(Duration::from_secs(5));
        let start = Instant::now();

        limiter.acquire("a.example").await;
        limiter.acquire("b.example").await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_wait_after_interval_elapsed() {
        let mut limiter = RateLimiter::new(Duration::from_millis(100));
        limiter.acquire("example.com").await;
        tokio::time::advance(Duration::from_millis(150)).await;
        assert_eq!(
            limiter.time_until_next_request("example.com", Instant::now()),
            None
        );
    }

    #[test]
    fn test_visited_is_write_once() {
        let mut state = CrawlState::new(Duration::ZERO);
        assert!(state.mark_visited("https://example.com/"));
        assert!(!state.mark_visited("https://example.com/"));
        assert!(state.is_visited("https://example.com/"));
        assert_eq!(state.visited_count(), 1);
        assert_eq!(state.stats().pages_visited, 1);
    }
}
