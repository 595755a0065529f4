use serde::Deserialize;

/// Main configuration structure for the crawler
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub board: BoardConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Absolute URL of the listing page a crawl starts from when no
    /// checkpoint exists
    pub fn root_listing_url(&self) -> String {
        format!(
            "{}/bbs/{}/{}",
            self.board.host.trim_end_matches('/'),
            self.board.name,
            self.board.start_page
        )
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Upper bound on listing pages visited in one run
    pub pages: u32,

    /// Number of posts of one listing page fetched and extracted concurrently
    #[serde(rename = "max-concurrent-posts", default = "default_concurrency")]
    pub max_concurrent_posts: usize,
}

fn default_concurrency() -> usize {
    4
}

/// The board being crawled and how its posts are recognised
#[derive(Debug, Clone, Deserialize)]
pub struct BoardConfig {
    /// Scheme and host that relative links are resolved against
    pub host: String,

    /// Board name as it appears in `/bbs/{name}/`
    pub name: String,

    /// Listing page file the crawl starts from, e.g. `index979.html`
    #[serde(rename = "start-page", default = "default_start_page")]
    pub start_page: String,

    /// Tag written into the `source` column of every record
    #[serde(default = "default_source")]
    pub source: String,

    /// Title token that marks a sale offer
    #[serde(rename = "sale-marker", default = "default_sale_marker")]
    pub sale_marker: String,

    /// Title prefix that marks a reply
    #[serde(rename = "reply-marker", default = "default_reply_marker")]
    pub reply_marker: String,
}

fn default_start_page() -> String {
    "index.html".to_string()
}

fn default_source() -> String {
    "ptt".to_string()
}

fn default_sale_marker() -> String {
    "出售".to_string()
}

fn default_reply_marker() -> String {
    "Re:".to_string()
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving one CSV file per listing page
    #[serde(rename = "records-dir")]
    pub records_dir: String,

    /// File holding the URL of the next listing page to crawl
    #[serde(rename = "checkpoint-path")]
    pub checkpoint_path: String,
}
