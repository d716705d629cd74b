pub mod state;
pub mod web;

#[cfg(test)]
mod tests;

pub use state::{CrawlState, RateLimiter};
pub use web::{CrawlLimits, crawl};
