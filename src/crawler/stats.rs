//! Run statistics
//!
//! Counters collected while crawling, logged once the run ends.

use crate::extract::SkipReason;
use std::collections::BTreeMap;

/// Summary of one crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Listing pages whose batch was persisted
    pub pages_processed: u64,

    /// Post links found on those pages, repeats included
    pub posts_discovered: u64,

    /// Post links dropped because the run had already visited them
    pub duplicate_posts: u64,

    /// Records written to output files
    pub records_saved: u64,

    /// Skipped posts per reason
    pub skipped: BTreeMap<SkipReason, u64>,

    /// Checkpoint written by this run; `None` when it never advanced it
    pub next_page_url: Option<String>,

    /// Whether the run ended on a stop request rather than its page budget
    pub stopped_early: bool,
}

impl CrawlStats {
    pub(crate) fn record_skip(&mut self, reason: SkipReason) {
        *self.skipped.entry(reason).or_insert(0) += 1;
    }

    /// Total skipped posts
    pub fn total_skipped(&self) -> u64 {
        self.skipped.values().sum()
    }

    /// Share of attempted posts that became records, in percent
    pub fn yield_rate(&self) -> f64 {
        let attempted = self.records_saved + self.total_skipped();
        if attempted == 0 {
            0.0
        } else {
            self.records_saved as f64 / attempted as f64 * 100.0
        }
    }

    /// Writes the summary to the log
    pub fn log_summary(&self) {
        tracing::info!(
            "Crawl finished: {} pages, {} posts found ({} repeats), {} records saved ({:.1}% yield)",
            self.pages_processed,
            self.posts_discovered,
            self.duplicate_posts,
            self.records_saved,
            self.yield_rate()
        );

        for (reason, count) in &self.skipped {
            tracing::info!("  skipped ({}): {}", reason, count);
        }

        match &self.next_page_url {
            Some(url) => tracing::info!("Next run resumes at {}", url),
            None => tracing::info!("Checkpoint not advanced by this run"),
        }
    }
}
