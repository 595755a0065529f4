//! Field extraction for a single board post
//!
//! A post page carries its metadata in `.article-metaline` rows (author,
//! title, date, in that order) and its body as the direct text children of
//! `#main-content`. Quoted replies and push comments live in nested elements
//! and are left out of the body.

use crate::config::BoardConfig;
use crate::extract::{parse_post_date, ExtractError};
use crate::record::Record;
use regex::Regex;
use scraper::{Html, Selector};

const META_VALUE_SELECTOR: &str = ".article-metaline .article-meta-value";
const MAIN_CONTENT_SELECTOR: &str = "#main-content";

/// Three-or-more digit number ending in two zeros
const PRICE_PATTERN: &str = r"\d+00";

/// Extracts validated records from post documents of one board
#[derive(Debug, Clone)]
pub struct PostExtractor {
    source: String,
    sale_marker: String,
    reply_marker: String,
    price: Regex,
    meta_values: Selector,
    main_content: Selector,
}

impl PostExtractor {
    /// Builds an extractor from the board's markers and source tag
    pub fn new(board: &BoardConfig) -> Self {
        Self {
            source: board.source.clone(),
            sale_marker: board.sale_marker.clone(),
            reply_marker: board.reply_marker.clone(),
            price: Regex::new(PRICE_PATTERN).expect("price pattern is valid"),
            meta_values: Selector::parse(META_VALUE_SELECTOR).expect("metadata selector is valid"),
            main_content: Selector::parse(MAIN_CONTENT_SELECTOR)
                .expect("content selector is valid"),
        }
    }

    /// Extracts a record from a fetched post document
    ///
    /// Checks run in a fixed order: title markers first, then author and
    /// date, then the price in the body. The first failing check decides the
    /// error.
    ///
    /// # Arguments
    ///
    /// * `html` - The post page as fetched
    /// * `url` - Absolute URL of the post, stored in the record
    pub fn extract(&self, html: &str, url: &str) -> Result<Record, ExtractError> {
        let document = Html::parse_document(html);

        let meta: Vec<String> = document
            .select(&self.meta_values)
            .map(|el| el.text().collect::<String>())
            .collect();
        if meta.len() < 3 {
            return Err(ExtractError::Structure(format!(
                "expected author, title and date fields, found {}",
                meta.len()
            )));
        }

        let name = self.format_name(&meta[1])?;

        let author = meta[0]
            .split_whitespace()
            .next()
            .ok_or_else(|| ExtractError::Structure("empty author field".to_string()))?
            .to_string();

        let date = parse_post_date(&meta[2])
            .ok_or_else(|| ExtractError::Structure(format!("unreadable date '{}'", meta[2].trim())))?;

        let content = document
            .select(&self.main_content)
            .next()
            .ok_or_else(|| ExtractError::Structure("missing main content".to_string()))?;
        let body = content
            .children()
            .filter_map(|node| node.value().as_text())
            .map(|text| &**text)
            .collect::<Vec<_>>()
            .join(" ");

        let price = self.find_price(&body, &name)?;

        Ok(Record::new(
            name,
            price,
            self.source.clone(),
            author,
            date,
            url.to_string(),
        ))
    }

    /// Validates a post title and cuts the item name out of it
    ///
    /// The name is whatever follows the last closing bracket, ASCII `]` or
    /// full-width `］`. A sale marker left in front of the name is dropped.
    fn format_name(&self, title: &str) -> Result<String, ExtractError> {
        let title = title.trim();

        if !title.contains(&self.sale_marker) {
            return Err(ExtractError::NotASalePost {
                title: title.to_string(),
            });
        }

        if title.starts_with(&self.reply_marker) {
            return Err(ExtractError::NotOriginalPost {
                title: title.to_string(),
            });
        }

        let start = [']', '］']
            .iter()
            .filter_map(|bracket| title.rfind(*bracket).map(|i| i + bracket.len_utf8()))
            .max()
            .unwrap_or(0);

        let mut name = title[start..].trim();
        if let Some(rest) = name.strip_prefix(self.sale_marker.as_str()) {
            name = rest.trim();
        }

        if name.is_empty() {
            return Err(ExtractError::EmptyName {
                title: title.to_string(),
            });
        }

        Ok(name.to_string())
    }

    /// Takes the first price-shaped token of the body
    fn find_price(&self, body: &str, name: &str) -> Result<u64, ExtractError> {
        let not_found = || ExtractError::PriceNotFound {
            name: name.to_string(),
        };

        let token = self.price.find(body).ok_or_else(not_found)?;
        // Digit runs too long for u64 are phone numbers or ids, not prices
        let price: u64 = token.as_str().parse().map_err(|_| not_found())?;

        if price == 0 {
            return Err(ExtractError::ZeroPrice {
                name: name.to_string(),
            });
        }

        Ok(price)
    }
}
