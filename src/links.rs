//! Link resolution and listing page tags
//!
//! Board pages link to posts and to neighbouring listing pages with
//! host-relative hrefs (`/bbs/photo-buy/M.1457.A.1C2.html`). Everything the
//! crawler fetches or records is first resolved against the configured host.

use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Tag used for a listing URL that carries no page number
pub const UNNUMBERED_PAGE_TAG: &str = "index";

/// Resolves an href found on a board page against the fixed host prefix
///
/// Absolute hrefs are kept as they are. The fragment is dropped so the
/// same post reached through different anchors dedups to one URL.
///
/// # Examples
///
/// ```
/// use ptt_camera_crawler::links::resolve_link;
///
/// let url = resolve_link("https://www.ptt.cc", "/bbs/photo-buy/M.1.A.html").unwrap();
/// assert_eq!(url, "https://www.ptt.cc/bbs/photo-buy/M.1.A.html");
/// ```
pub fn resolve_link(host: &str, href: &str) -> Result<String, url::ParseError> {
    let base = Url::parse(host)?;
    let mut resolved = base.join(href.trim())?;
    resolved.set_fragment(None);
    Ok(resolved.into())
}

/// Derives the output tag of a listing page from its numeric identifier
///
/// `.../index979.html` is tagged `979`. The board's newest page
/// (`.../index.html`) has no number and is tagged `index`.
pub fn page_tag(listing_url: &str) -> String {
    static PAGE_NUMBER: OnceLock<Regex> = OnceLock::new();
    let pattern =
        PAGE_NUMBER.get_or_init(|| Regex::new(r"(\d+)\.html").expect("page number pattern is valid"));

    pattern
        .captures(listing_url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNNUMBERED_PAGE_TAG.to_string())
}
