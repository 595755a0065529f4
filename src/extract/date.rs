use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Date-time layouts tried in order after whitespace is collapsed
const DATETIME_FORMATS: &[&str] = &[
    // What the board prints: "Tue Mar 15 21:43:12 2016"
    "%a %b %d %H:%M:%S %Y",
    "%b %d %H:%M:%S %Y",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%a %b %d %Y", "%b %d %Y"];

/// Parses the free-text date field of a post header
///
/// The board's own ctime-style stamp is the common case. ISO-8601, RFC 3339,
/// RFC 2822 and slash-separated dates are accepted as well, and a bare date
/// resolves to midnight. Offsets are dropped in favour of the wall-clock time
/// the author saw.
///
/// # Examples
///
/// ```
/// use ptt_camera_crawler::extract::parse_post_date;
///
/// let date = parse_post_date("Tue Mar  1 09:05:00 2016").unwrap();
/// assert_eq!(date.to_string(), "2016-03-01 09:05:00");
/// ```
pub fn parse_post_date(raw: &str) -> Option<NaiveDateTime> {
    let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(&text) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(&text) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(&text, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
