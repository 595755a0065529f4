//! Listing page walker
//!
//! A board listing renders one `div.r-ent` row per post and a paging bar
//! (`#action-bar-container .btn-group-paging`) whose buttons read, in order:
//! oldest, previous, next, newest. Crawling walks backwards in time, so the
//! second button is the page visited after this one.

use crate::crawler::Fetcher;
use crate::links::resolve_link;
use crate::CrawlerError;
use scraper::{Html, Selector};

const ROW_SELECTOR: &str = "div.r-ent";
const ROW_LINK_SELECTOR: &str = "a[href]";
const PAGING_SELECTOR: &str = "#action-bar-container .btn-group-paging a";

/// Position of the older-page button in the paging bar
const NEXT_PAGE_BUTTON: usize = 1;

/// Post links and the continuation of one listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    /// Absolute post URLs in page order; may repeat (pinned posts)
    pub post_urls: Vec<String>,

    /// Absolute URL of the next listing page, `None` on the board's oldest
    /// page where the button is rendered without a link
    pub next_page_url: Option<String>,
}

/// Extracts post links and the next-page link from listing pages
#[derive(Debug, Clone)]
pub struct PageWalker {
    host: String,
    rows: Selector,
    row_link: Selector,
    paging: Selector,
}

impl PageWalker {
    /// Creates a walker resolving relative links against `host`
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            rows: Selector::parse(ROW_SELECTOR).expect("row selector is valid"),
            row_link: Selector::parse(ROW_LINK_SELECTOR).expect("row link selector is valid"),
            paging: Selector::parse(PAGING_SELECTOR).expect("paging selector is valid"),
        }
    }

    /// Fetches a listing page and walks it
    ///
    /// Both a failed fetch and a page without the paging bar are fatal for
    /// the run: without the next-page link the checkpoint chain breaks.
    pub async fn walk(
        &self,
        fetcher: &dyn Fetcher,
        page_url: &str,
    ) -> Result<ListingPage, CrawlerError> {
        let html = fetcher.get(page_url).await?;
        self.parse(&html, page_url)
    }

    /// Walks an already fetched listing page
    pub fn parse(&self, html: &str, page_url: &str) -> Result<ListingPage, CrawlerError> {
        let document = Html::parse_document(html);

        let mut post_urls = Vec::new();
        for row in document.select(&self.rows) {
            let Some(href) = row
                .select(&self.row_link)
                .next()
                .and_then(|a| a.value().attr("href"))
            else {
                // Deleted posts keep their row but lose the link
                tracing::warn!("Skipped a listing row without a link on {}", page_url);
                continue;
            };

            match resolve_link(&self.host, href) {
                Ok(url) => {
                    tracing::debug!("Found: {}", url);
                    post_urls.push(url);
                }
                Err(e) => tracing::warn!("Skipped unresolvable post link '{}': {}", href, e),
            }
        }

        let structure_error = |message: String| CrawlerError::PageStructure {
            url: page_url.to_string(),
            message,
        };

        let buttons: Vec<_> = document.select(&self.paging).collect();
        let button = buttons.get(NEXT_PAGE_BUTTON).ok_or_else(|| {
            structure_error(format!(
                "paging control has {} buttons, expected at least {}",
                buttons.len(),
                NEXT_PAGE_BUTTON + 1
            ))
        })?;

        let next_page_url = match button.value().attr("href") {
            Some(href) => Some(
                resolve_link(&self.host, href)
                    .map_err(|e| structure_error(format!("bad next-page link '{}': {}", href, e)))?,
            ),
            None => None,
        };

        Ok(ListingPage {
            post_urls,
            next_page_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: &str = "https://www.ptt.cc";
    const PAGE: &str = "https://www.ptt.cc/bbs/photo-buy/index979.html";

    fn listing(rows: &str, paging: &str) -> String {
        format!(
            r#"<html><body>
<div id="action-bar-container"><div class="action-bar"><div class="btn-group btn-group-paging">{paging}</div></div></div>
<div class="r-list-container action-bar-margin bbs-screen">{rows}</div>
</body></html>"#
        )
    }

    fn row(href: Option<&str>, title: &str) -> String {
        match href {
            Some(h) => format!(r#"<div class="r-ent"><div class="title"><a href="{h}">{title}</a></div></div>"#),
            None => format!(r#"<div class="r-ent"><div class="title">{title}</div></div>"#),
        }
    }

    const PAGING: &str = r#"<a class="btn wide" href="/bbs/photo-buy/index1.html">最舊</a>
<a class="btn wide" href="/bbs/photo-buy/index978.html">‹ 上頁</a>
<a class="btn wide" href="/bbs/photo-buy/index980.html">下頁 ›</a>
<a class="btn wide" href="/bbs/photo-buy/index.html">最新</a>"#;

    #[test]
    fn test_collects_posts_and_next_page() {
        let rows = [
            row(Some("/bbs/photo-buy/M.1.A.html"), "[出售] Nikon FM2"),
            row(Some("/bbs/photo-buy/M.2.A.html"), "[徵求] Leica"),
        ]
        .concat();
        let page = PageWalker::new(HOST).parse(&listing(&rows, PAGING), PAGE).unwrap();

        assert_eq!(
            page.post_urls,
            vec![
                "https://www.ptt.cc/bbs/photo-buy/M.1.A.html",
                "https://www.ptt.cc/bbs/photo-buy/M.2.A.html",
            ]
        );
        assert_eq!(
            page.next_page_url.as_deref(),
            Some("https://www.ptt.cc/bbs/photo-buy/index978.html")
        );
    }

    #[test]
    fn test_skips_rows_without_link() {
        let rows = [
            row(None, "(本文已被刪除) [someone]"),
            row(Some("/bbs/photo-buy/M.3.A.html"), "[出售] Contax T2"),
        ]
        .concat();
        let page = PageWalker::new(HOST).parse(&listing(&rows, PAGING), PAGE).unwrap();

        assert_eq!(page.post_urls, vec!["https://www.ptt.cc/bbs/photo-buy/M.3.A.html"]);
    }

    #[test]
    fn test_keeps_repeated_rows() {
        let rows = [
            row(Some("/bbs/photo-buy/M.1.A.html"), "[出售] Nikon FM2"),
            row(Some("/bbs/photo-buy/M.1.A.html"), "[出售] Nikon FM2"),
        ]
        .concat();
        let page = PageWalker::new(HOST).parse(&listing(&rows, PAGING), PAGE).unwrap();

        assert_eq!(page.post_urls.len(), 2);
    }

    #[test]
    fn test_missing_paging_control_is_fatal() {
        let html = r#"<html><body><div class="r-ent"><a href="/bbs/photo-buy/M.1.A.html">x</a></div></body></html>"#;
        let err = PageWalker::new(HOST).parse(html, PAGE).unwrap_err();

        assert!(matches!(err, CrawlerError::PageStructure { .. }));
    }

    #[test]
    fn test_oldest_page_has_no_next() {
        let paging = r#"<a class="btn wide disabled">最舊</a>
<a class="btn wide disabled">‹ 上頁</a>
<a class="btn wide" href="/bbs/photo-buy/index2.html">下頁 ›</a>
<a class="btn wide" href="/bbs/photo-buy/index.html">最新</a>"#;
        let page = PageWalker::new(HOST).parse(&listing("", paging), PAGE).unwrap();

        assert!(page.post_urls.is_empty());
        assert_eq!(page.next_page_url, None);
    }
}
