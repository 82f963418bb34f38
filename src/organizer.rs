//! Recency ordering for article lists.
//!
//! Articles are sorted newest first by their parsed `published_at`. The sort
//! is stable, so articles with the same timestamp keep their concatenation
//! order (first provider before second). Timestamps that cannot be parsed
//! sort after every valid one.

use crate::models::{AggregatedNews, Article};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::cmp::Reverse;
use tracing::{debug, instrument};

/// Offset-less formats some feeds emit; interpreted as UTC.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a provider timestamp into a comparable instant.
///
/// Returns `None` for anything that is not a recognizable date.
pub fn parse_published_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_rfc2822(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc())
}

/// Sort articles newest first.
pub fn sort_by_recency(mut articles: Vec<Article>) -> Vec<Article> {
    // None < Some, so under Reverse unparseable timestamps land at the end.
    // sort_by_cached_key keeps equal keys in their original order.
    articles.sort_by_cached_key(|a| Reverse(parse_published_at(&a.published_at)));
    articles
}

/// Sort every category of an aggregated result.
///
/// Consumes the input and returns a new mapping with the same key order.
#[instrument(level = "debug", skip_all, fields(categories = news.len()))]
pub fn organize(news: AggregatedNews) -> AggregatedNews {
    news.into_iter()
        .map(|(category, articles)| {
            debug!(%category, count = articles.len(), "Sorting category");
            (category, sort_by_recency(articles))
        })
        .collect()
}
