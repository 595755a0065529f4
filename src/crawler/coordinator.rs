//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives a run page by page:
//! - Resolving the resume point from the checkpoint
//! - Walking each listing page for post links and the next page
//! - Extracting records from the page's posts with a bounded worker pool
//! - Persisting the page's batch, then advancing the checkpoint
//!
//! The checkpoint only ever moves after a batch is on disk. A crash mid-page
//! therefore resumes at that same page and rewrites its file.

use crate::config::Config;
use crate::crawler::walker::PageWalker;
use crate::crawler::{CrawlStats, Fetcher, HttpFetcher};
use crate::extract::{ExtractError, PostExtractor, RecordExtractor, SkipReason};
use crate::links::page_tag;
use crate::record::Record;
use crate::storage::{CheckpointStore, CsvSink, FileCheckpoint, RecordSink};
use crate::CrawlerError;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinError;

/// Result of handling one post
enum PostOutcome {
    Extracted(Record),
    Rejected(ExtractError),
    /// The extraction task died (panicked) instead of returning
    Faulted(String),
}

/// Main crawler coordinator structure
pub struct Coordinator {
    root_url: String,
    pages: u32,
    max_concurrent_posts: usize,
    fresh: bool,
    fetcher: Arc<dyn Fetcher>,
    walker: PageWalker,
    extractor: Arc<dyn RecordExtractor>,
    checkpoint: Box<dyn CheckpointStore + Send>,
    sink: Box<dyn RecordSink + Send>,
    /// Post URLs already attempted during this run
    seen: HashSet<String>,
    stop: Arc<AtomicBool>,
}

impl Coordinator {
    /// Creates a coordinator fetching over HTTP and writing to the
    /// configured checkpoint file and records directory
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `fresh` - Start from the root listing page, ignoring the checkpoint
    pub fn new(config: &Config, fresh: bool) -> Result<Self, CrawlerError> {
        let fetcher = HttpFetcher::from_config(&config.user_agent).map_err(|e| {
            CrawlerError::Fetch(crate::crawler::FetchError::Http {
                url: config.board.host.clone(),
                source: e,
            })
        })?;

        Ok(Self::from_parts(
            config,
            fresh,
            Arc::new(fetcher),
            Box::new(FileCheckpoint::new(&config.output.checkpoint_path)),
            Box::new(CsvSink::new(&config.output.records_dir)),
        ))
    }

    /// Creates a coordinator over explicit collaborators
    pub fn from_parts(
        config: &Config,
        fresh: bool,
        fetcher: Arc<dyn Fetcher>,
        checkpoint: Box<dyn CheckpointStore + Send>,
        sink: Box<dyn RecordSink + Send>,
    ) -> Self {
        Self {
            root_url: config.root_listing_url(),
            pages: config.crawler.pages,
            max_concurrent_posts: config.crawler.max_concurrent_posts.max(1),
            fresh,
            fetcher,
            walker: PageWalker::new(config.board.host.clone()),
            extractor: Arc::new(PostExtractor::new(&config.board)),
            checkpoint,
            sink,
            seen: HashSet::new(),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replaces the board's post extractor
    pub fn with_extractor(mut self, extractor: Arc<dyn RecordExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Flag that, once set, ends the run before the next listing page
    ///
    /// A page already in progress is always finished and persisted.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    /// Listing page the run starts from
    pub fn start_page(&self) -> Result<String, CrawlerError> {
        if self.fresh {
            return Ok(self.root_url.clone());
        }

        Ok(self
            .checkpoint
            .read()?
            .unwrap_or_else(|| self.root_url.clone()))
    }

    /// Runs the crawl until the page budget is spent, the board runs out of
    /// pages, or a stop is requested
    ///
    /// Listing-page failures and persistence failures end the run with an
    /// error; the checkpoint then still names the first unsaved page.
    pub async fn run(&mut self) -> Result<CrawlStats, CrawlerError> {
        let mut stats = CrawlStats::default();
        let mut page_url = self.start_page()?;
        let mut last_checkpoint = None;
        tracing::info!("Starting crawl at {} ({} pages max)", page_url, self.pages);

        for _ in 0..self.pages {
            if self.stop.load(Ordering::SeqCst) {
                tracing::info!("Stop requested, not starting {}", page_url);
                stats.stopped_early = true;
                break;
            }

            let listing = match self.walker.walk(self.fetcher.as_ref(), &page_url).await {
                Ok(listing) => listing,
                Err(e) => {
                    tracing::error!("Cannot walk listing page {}: {}", page_url, e);
                    return Err(e);
                }
            };

            stats.posts_discovered += listing.post_urls.len() as u64;
            let batch = self.process_page(listing.post_urls, &mut stats).await;

            let tag = page_tag(&page_url);
            self.sink.save(&batch, &tag)?;
            stats.pages_processed += 1;
            stats.records_saved += batch.len() as u64;
            tracing::info!("Page {} done: {} records", tag, batch.len());

            match listing.next_page_url {
                Some(next) => {
                    self.checkpoint.write(&next)?;
                    last_checkpoint = Some(next.clone());
                    page_url = next;
                }
                None => {
                    tracing::info!("{} is the oldest listing page", page_url);
                    break;
                }
            }
        }

        stats.next_page_url = last_checkpoint;
        Ok(stats)
    }

    /// Extracts the records of one listing page
    ///
    /// Posts already attempted earlier in the run are dropped. The batch is
    /// returned only after every remaining post has been attempted; row
    /// order in it is unspecified.
    async fn process_page(&mut self, post_urls: Vec<String>, stats: &mut CrawlStats) -> Vec<Record> {
        let found = post_urls.len();
        let pending: Vec<String> = post_urls
            .into_iter()
            .filter(|url| self.seen.insert(url.clone()))
            .collect();
        stats.duplicate_posts += (found - pending.len()) as u64;

        let fetcher = &self.fetcher;
        let extractor = &self.extractor;
        let outcomes: Vec<(String, PostOutcome)> = stream::iter(pending)
            .map(|url| {
                let fetcher = fetcher.clone();
                let extractor = extractor.clone();
                async move {
                    let outcome = fetch_and_extract(fetcher, extractor, &url).await;
                    (url, outcome)
                }
            })
            .buffer_unordered(self.max_concurrent_posts)
            .collect()
            .await;

        let mut batch = Vec::new();
        for (url, outcome) in outcomes {
            match outcome {
                PostOutcome::Extracted(record) => {
                    tracing::info!("Extracted {}", record);
                    batch.push(record);
                }
                PostOutcome::Rejected(e) => {
                    tracing::info!("Skipped {}: {}", url, e);
                    stats.record_skip(e.kind());
                }
                PostOutcome::Faulted(message) => {
                    tracing::warn!("Skipped {}, unexpected fault: {}", url, message);
                    stats.record_skip(SkipReason::Unclassified);
                }
            }
        }

        batch
    }
}

/// Fetches one post and extracts its record off the async workers
async fn fetch_and_extract(
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn RecordExtractor>,
    url: &str,
) -> PostOutcome {
    let html = match fetcher.get(url).await {
        Ok(html) => html,
        Err(e) => return PostOutcome::Rejected(ExtractError::Fetch(e)),
    };

    let owned_url = url.to_string();
    classify(tokio::task::spawn_blocking(move || extractor.extract(&html, &owned_url)).await)
}

fn classify(result: Result<Result<Record, ExtractError>, JoinError>) -> PostOutcome {
    match result {
        Ok(Ok(record)) => PostOutcome::Extracted(record),
        Ok(Err(e)) => PostOutcome::Rejected(e),
        Err(join_error) => PostOutcome::Faulted(join_error.to_string()),
    }
}
