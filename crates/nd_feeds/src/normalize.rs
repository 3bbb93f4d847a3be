use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use nd_core::config::FeedConfig;
use nd_core::feeds::FeedEntry;
use nd_core::types::{truncate_chars, Article, ReadStatus};

use crate::html::clean_html;

/// Store-side limit on text properties.
const MAX_FIELD_CHARS: usize = 2000;

/// Turn a raw feed entry into a storable article. Entries without a link are
/// dropped: the URL is the article's identity in the store. Everything else
/// degrades instead of failing; a missing title becomes "Untitled", an
/// unparseable date becomes no date.
pub fn normalize_entry(
    entry: &FeedEntry,
    feed: &FeedConfig,
    scraped_at: DateTime<Utc>,
) -> Option<Article> {
    let url = entry.link.clone().filter(|link| !link.is_empty())?;

    let title = match &entry.title {
        Some(title) => truncate_chars(title, MAX_FIELD_CHARS).to_string(),
        None => "Untitled".to_string(),
    };

    let summary = entry
        .summary
        .as_deref()
        .map(clean_html)
        .map(|text| truncate_chars(&text, MAX_FIELD_CHARS).to_string())
        .filter(|text| !text.is_empty());

    let published_at = entry.published.as_deref().and_then(parse_date);

    Some(Article {
        url,
        title,
        source: feed.name.clone(),
        category: feed.category.clone(),
        summary,
        published_at,
        scraped_at,
        status: ReadStatus::Unread,
    })
}

/// Parse whatever date shape the feed used. Failures yield `None`, never an
/// error.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&parsed));
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let midnight = parsed.and_hms_opt(0, 0, 0)?;
        return Some(Utc.from_utc_datetime(&midnight));
    }
    None
}
