//! Validated camera-sale record
//!
//! A `Record` is only produced by the post extractor after every field has
//! been validated, and is never modified afterwards. Its serialized column
//! order is the contract with the downstream analysis step:
//! `name, price, source, author, date, url`.

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use std::fmt;

/// Timestamp layout used in the output files
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One sale offer extracted from a board post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    name: String,
    price: u64,
    source: String,
    author: String,
    #[serde(serialize_with = "serialize_date")]
    date: NaiveDateTime,
    url: String,
}

impl Record {
    pub(crate) fn new(
        name: String,
        price: u64,
        source: String,
        author: String,
        date: NaiveDateTime,
        url: String,
    ) -> Self {
        debug_assert!(price > 0);
        debug_assert!(!name.trim().is_empty());
        Self {
            name,
            price,
            source,
            author,
            date,
            url,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn date(&self) -> NaiveDateTime {
        self.date
    }

    /// Absolute URL of the post this record came from
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{} {}NTD {}>",
            self.name,
            self.price,
            self.date.format(DATE_FORMAT)
        )
    }
}

fn serialize_date<S: Serializer>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format(DATE_FORMAT))
}
