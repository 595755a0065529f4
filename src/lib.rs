//! PTT camera crawler: a resumable crawler for second-hand camera offers
//!
//! This crate walks the paginated listing of a PTT board, extracts sale
//! postings into validated records, and writes one CSV file per listing page
//! for downstream price-trend analysis.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod links;
pub mod record;
pub mod storage;

use thiserror::Error;

/// Main error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("Unexpected listing structure at {url}: {message}")]
    PageStructure { url: String, message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlStats};
pub use extract::{ExtractError, PostExtractor, RecordExtractor, SkipReason};
pub use record::Record;
