//! Crawler module for board traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `Fetcher` trait
//! - Listing page walking (post links and the next page)
//! - Page-by-page coordination with checkpointing
//! - Run statistics

mod coordinator;
mod fetcher;
mod stats;
mod walker;

pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, FetchError, Fetcher, HttpFetcher};
pub use stats::CrawlStats;
pub use walker::{ListingPage, PageWalker};
