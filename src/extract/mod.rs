//! Post extraction
//!
//! Turns one fetched post document into a validated [`Record`] or an
//! [`ExtractError`] naming why the post was rejected. Rejections are the
//! normal case for most posts on a market board (wanted ads, replies,
//! posts without a usable price) and never abort a crawl.
//!
//! [`Record`]: crate::record::Record

mod date;
mod post;

pub use date::parse_post_date;
pub use post::PostExtractor;

use crate::crawler::FetchError;
use crate::record::Record;
use std::fmt;
use thiserror::Error;

/// Turns a fetched post document into a record
///
/// Called from blocking worker threads, one post at a time.
pub trait RecordExtractor: Send + Sync {
    fn extract(&self, html: &str, url: &str) -> Result<Record, ExtractError>;
}

impl RecordExtractor for PostExtractor {
    fn extract(&self, html: &str, url: &str) -> Result<Record, ExtractError> {
        PostExtractor::extract(self, html, url)
    }
}

/// Reasons a post does not yield a record
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Not a sale post ({title})")]
    NotASalePost { title: String },

    #[error("Not an original post ({title})")]
    NotOriginalPost { title: String },

    #[error("No price found ({name})")]
    PriceNotFound { name: String },

    #[error("Invalid price ({name})")]
    ZeroPrice { name: String },

    #[error("Empty item name ({title})")]
    EmptyName { title: String },

    #[error("Unexpected post structure: {0}")]
    Structure(String),

    #[error("Post fetch failed: {0}")]
    Fetch(#[from] FetchError),
}

impl ExtractError {
    /// Classifies the error for run statistics
    pub fn kind(&self) -> SkipReason {
        match self {
            Self::NotASalePost { .. } => SkipReason::NotASalePost,
            Self::NotOriginalPost { .. } => SkipReason::NotOriginalPost,
            Self::PriceNotFound { .. } => SkipReason::PriceNotFound,
            Self::ZeroPrice { .. } => SkipReason::ZeroPrice,
            Self::EmptyName { .. } => SkipReason::EmptyName,
            Self::Structure(_) => SkipReason::Structure,
            Self::Fetch(_) => SkipReason::Fetch,
        }
    }
}

/// Why a post was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SkipReason {
    NotASalePost,
    NotOriginalPost,
    PriceNotFound,
    ZeroPrice,
    EmptyName,
    Structure,
    Fetch,
    /// Extraction task failed in a way the extractor does not report
    Unclassified,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotASalePost => "not a sale post",
            Self::NotOriginalPost => "reply post",
            Self::PriceNotFound => "no price",
            Self::ZeroPrice => "zero price",
            Self::EmptyName => "empty name",
            Self::Structure => "malformed post",
            Self::Fetch => "fetch failed",
            Self::Unclassified => "unclassified fault",
        };
        f.write_str(label)
    }
}
