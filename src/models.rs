//! Data models shared by the providers, the aggregator and the outputs.
//!
//! - [`Article`]: one normalized story, whatever provider it came from
//! - [`CategorySet`]: the fixed, ordered list of categories we aggregate
//! - [`AggregatedNews`]: category → articles, in category-set order
//! - [`Edition`]: a dated snapshot written by the JSON output
//!
//! Articles serialize with camelCase field names (`publishedAt`) so the JSON
//! output matches the schema consumers of the old aggregator already read.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// The categories aggregated when the configuration does not override them.
pub const DEFAULT_CATEGORIES: [&str; 7] = [
    "business",
    "technology",
    "sports",
    "entertainment",
    "health",
    "science",
    "politics",
];

/// A news article normalized from one of the providers.
///
/// Built fresh on every fetch and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Headline. Some providers omit it.
    pub title: Option<String>,
    /// Author or byline, depending on the provider.
    pub author: Option<String>,
    /// Short summary or trailing text.
    pub description: Option<String>,
    /// Canonical link to the full story.
    pub url: String,
    /// The category that was requested, not one the provider confirmed.
    pub category: String,
    /// Fixed label of the provider that produced the record.
    pub source: String,
    /// Raw timestamp text as returned by the provider.
    ///
    /// Only parsed when sorting; see [`crate::organizer::parse_published_at`].
    pub published_at: String,
}

/// The fixed, ordered set of categories.
///
/// Order matters: it is the key order of every [`AggregatedNews`] built from
/// this set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySet {
    categories: Vec<String>,
}

impl CategorySet {
    /// Build a set from an explicit list.
    ///
    /// Callers are expected to have validated the list already
    /// (see [`crate::config::Settings::validate`]).
    pub fn new<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }
}

impl Default for CategorySet {
    fn default() -> Self {
        Self::new(DEFAULT_CATEGORIES)
    }
}

/// Articles grouped by category.
///
/// Behaves like an insertion-ordered map: keys keep the order in which they
/// were first inserted, which for aggregator output is category-set order.
/// Serializes as a JSON object in that same order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedNews {
    entries: Vec<(String, Vec<Article>)>,
}

impl AggregatedNews {
    /// An entry with an empty article list for every category in the set.
    pub fn with_categories(categories: &CategorySet) -> Self {
        Self {
            entries: categories
                .iter()
                .map(|c| (c.to_string(), Vec::new()))
                .collect(),
        }
    }

    /// Set the articles for `category`, keeping the key's position if it
    /// already exists and appending it otherwise.
    pub fn insert(&mut self, category: impl Into<String>, articles: Vec<Article>) {
        let category = category.into();
        match self.entries.iter_mut().find(|(c, _)| *c == category) {
            Some((_, existing)) => *existing = articles,
            None => self.entries.push((category, articles)),
        }
    }

    pub fn get(&self, category: &str) -> Option<&[Article]> {
        self.entries
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, articles)| articles.as_slice())
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Article])> {
        self.entries
            .iter()
            .map(|(c, articles)| (c.as_str(), articles.as_slice()))
    }

    /// Total number of articles across all categories.
    pub fn article_count(&self) -> usize {
        self.entries.iter().map(|(_, articles)| articles.len()).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl IntoIterator for AggregatedNews {
    type Item = (String, Vec<Article>);
    type IntoIter = std::vec::IntoIter<(String, Vec<Article>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, Vec<Article>)> for AggregatedNews {
    fn from_iter<T: IntoIterator<Item = (String, Vec<Article>)>>(iter: T) -> Self {
        let mut news = AggregatedNews::default();
        for (category, articles) in iter {
            news.insert(category, articles);
        }
        news
    }
}

impl Serialize for AggregatedNews {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (category, articles) in &self.entries {
            map.serialize_entry(category, articles)?;
        }
        map.end()
    }
}

/// A dated snapshot of one aggregation run.
///
/// # Edition Naming
///
/// The `time_of_day` field categorizes editions as:
/// - `"morning"`: 00:00 - 08:00
/// - `"afternoon"`: 08:00 - 16:00
/// - `"evening"`: 16:00 - 24:00
#[derive(Debug, Serialize)]
pub struct Edition {
    /// The local date of the run in `YYYY-MM-DD` format.
    pub local_date: String,
    /// The time of day category: "morning", "afternoon", or "evening".
    pub time_of_day: String,
    /// The exact local time of the run.
    pub local_time: String,
    /// The aggregated, sorted articles.
    pub news: AggregatedNews,
}
