//! Fan-out over providers and categories.
//!
//! For each category both providers are queried concurrently and joined; the
//! first provider's articles come before the second's in the merged list,
//! which only matters for ties once the [`organizer`](crate::organizer) sorts
//! them. Across categories, up to `max_concurrent_categories` categories are
//! in flight at once; results are still collected in category-set order.

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::models::{AggregatedNews, Article, CategorySet};
use crate::organizer::{organize, sort_by_recency};
use crate::providers::guardian::Guardian;
use crate::providers::newsapi::NewsApi;
use crate::providers::{NewsProvider, build_client};
use futures::stream::{self, StreamExt};
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Number of articles returned by the top-news lookup when none is given.
pub const DEFAULT_TOP_LIMIT: usize = 10;

pub struct Aggregator<P, S> {
    primary: P,
    secondary: S,
    categories: CategorySet,
    max_concurrent_categories: usize,
}

impl Aggregator<NewsApi, Guardian> {
    /// NewsAPI first, Guardian second, sharing one HTTP client.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let client = build_client(settings.request_timeout())?;
        let news_api = NewsApi::new(client.clone(), &settings.news_api)?;
        let guardian = Guardian::new(client, &settings.guardian)?;
        Ok(Self::new(news_api, guardian, settings.category_set())
            .with_max_concurrent_categories(settings.max_concurrent_categories))
    }
}

impl<P, S> Aggregator<P, S>
where
    P: NewsProvider,
    S: NewsProvider,
{
    pub fn new(primary: P, secondary: S, categories: CategorySet) -> Self {
        Self {
            primary,
            secondary,
            categories,
            max_concurrent_categories: 1,
        }
    }

    /// Allow up to `n` categories to be fetched at once (minimum 1).
    pub fn with_max_concurrent_categories(mut self, n: usize) -> Self {
        self.max_concurrent_categories = n.max(1);
        self
    }

    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    /// Query both providers for one category and concatenate the results.
    async fn fetch_category(&self, category: &str) -> Vec<Article> {
        let (mut articles, secondary) = futures::join!(
            self.primary.fetch(category),
            self.secondary.fetch(category)
        );
        debug!(
            %category,
            primary = self.primary.label(),
            primary_count = articles.len(),
            secondary = self.secondary.label(),
            secondary_count = secondary.len(),
            "Joined providers"
        );
        articles.extend(secondary);
        articles
    }

    /// Fetch every category from both providers, sorted newest first.
    ///
    /// Every category in the set has an entry, even when both providers
    /// came back empty for it.
    #[instrument(level = "info", skip_all, fields(categories = self.categories.len()))]
    pub async fn fetch_all(&self) -> AggregatedNews {
        let t0 = Instant::now();
        let mut news = AggregatedNews::with_categories(&self.categories);

        let fetched: Vec<(&str, Vec<Article>)> = stream::iter(self.categories.iter())
            .map(|category| async move { (category, self.fetch_category(category).await) })
            .buffered(self.max_concurrent_categories)
            .collect()
            .await;

        for (category, articles) in fetched {
            news.insert(category, articles);
        }

        let news = organize(news);
        info!(
            articles = news.article_count(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Aggregated all categories"
        );
        news
    }

    /// The `limit` most recent articles for one category.
    ///
    /// Fails with [`Error::InvalidCategory`] before touching the network if
    /// `category` is not in the set. A `limit` of zero yields an empty list.
    #[instrument(level = "info", skip(self))]
    pub async fn top_news_by_category(&self, category: &str, limit: usize) -> Result<Vec<Article>> {
        if !self.categories.contains(category) {
            return Err(Error::InvalidCategory(category.to_string()));
        }
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut articles = sort_by_recency(self.fetch_category(category).await);
        articles.truncate(limit);
        info!(count = articles.len(), "Selected top articles");
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GuardianSettings, NewsApiSettings};
    use crate::organizer::parse_published_at;
    use crate::providers::test_server::{closed_endpoint, serve_once};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::sleep;

    /// Canned provider; categories without an entry behave like a failed fetch.
    struct StubProvider {
        label: &'static str,
        responses: HashMap<String, Vec<Article>>,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn new(label: &'static str) -> Self {
            Self {
                label,
                responses: HashMap::new(),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            }
        }

        fn with(mut self, category: &str, published: &[&str]) -> Self {
            let articles = published
                .iter()
                .enumerate()
                .map(|(i, ts)| Article {
                    title: Some(format!("{}-{category}-{i}", self.label)),
                    author: None,
                    description: None,
                    url: format!("https://example.com/{}/{category}/{i}", self.label),
                    category: category.to_string(),
                    source: self.label.to_string(),
                    published_at: ts.to_string(),
                })
                .collect();
            self.responses.insert(category.to_string(), articles);
            self
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl NewsProvider for StubProvider {
        fn label(&self) -> &str {
            self.label
        }

        async fn fetch(&self, category: &str) -> Vec<Article> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                sleep(self.delay).await;
            }
            self.responses.get(category).cloned().unwrap_or_default()
        }
    }

    fn titles(articles: &[Article]) -> Vec<&str> {
        articles.iter().filter_map(|a| a.title.as_deref()).collect()
    }

    #[tokio::test]
    async fn test_every_category_present_when_providers_fail() {
        let aggregator = Aggregator::new(
            StubProvider::new("A"),
            StubProvider::new("B"),
            CategorySet::default(),
        );

        let news = aggregator.fetch_all().await;

        assert_eq!(
            news.categories().collect::<Vec<_>>(),
            CategorySet::default().iter().collect::<Vec<_>>()
        );
        assert_eq!(news.article_count(), 0);
        assert_eq!(aggregator.primary.calls(), 7);
        assert_eq!(aggregator.secondary.calls(), 7);
    }

    #[tokio::test]
    async fn test_end_to_end_business_and_technology() {
        let aggregator = Aggregator::new(
            StubProvider::new("A").with("business", &["2024-01-02T00:00:00Z"]),
            StubProvider::new("B").with("business", &["2024-01-01T00:00:00Z"]),
            CategorySet::new(["business", "technology"]),
        );

        let news = aggregator.fetch_all().await;

        assert_eq!(news.len(), 2);
        assert_eq!(
            titles(news.get("business").unwrap()),
            ["A-business-0", "B-business-0"]
        );
        assert!(news.get("technology").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_all_sorts_merged_lists() {
        let aggregator = Aggregator::new(
            StubProvider::new("A").with("science", &["2024-01-01T00:00:00Z", "2024-01-03T00:00:00Z"]),
            StubProvider::new("B").with("science", &["2024-01-02T00:00:00Z", "garbage"]),
            CategorySet::new(["science"]),
        );

        let news = aggregator.fetch_all().await;
        let science = news.get("science").unwrap();

        assert_eq!(
            titles(science),
            ["A-science-1", "B-science-0", "A-science-0", "B-science-1"]
        );
        for pair in science.windows(2) {
            let (a, b) = (
                parse_published_at(&pair[0].published_at),
                parse_published_at(&pair[1].published_at),
            );
            assert!(b.is_none() || a >= b);
        }
    }

    #[tokio::test]
    async fn test_primary_wins_ties() {
        let aggregator = Aggregator::new(
            StubProvider::new("A").with("health", &["2024-01-01T00:00:00Z"]),
            StubProvider::new("B").with("health", &["2024-01-01T00:00:00Z"]),
            CategorySet::new(["health"]),
        );

        let top = aggregator.top_news_by_category("health", 10).await.unwrap();
        assert_eq!(titles(&top), ["A-health-0", "B-health-0"]);
    }

    #[tokio::test]
    async fn test_concurrent_categories_keep_set_order() {
        let categories = CategorySet::new(["business", "technology", "sports"]);
        let aggregator = Aggregator::new(
            StubProvider::new("A")
                .with("business", &["2024-01-01T00:00:00Z"])
                .with("sports", &["2024-01-03T00:00:00Z"])
                .with_delay(Duration::from_millis(50)),
            StubProvider::new("B").with("technology", &["2024-01-02T00:00:00Z"]),
            categories,
        )
        .with_max_concurrent_categories(3);

        let news = aggregator.fetch_all().await;

        assert_eq!(
            news.categories().collect::<Vec<_>>(),
            ["business", "technology", "sports"]
        );
        assert_eq!(titles(news.get("sports").unwrap()), ["A-sports-0"]);
        assert_eq!(titles(news.get("technology").unwrap()), ["B-technology-0"]);
    }

    #[tokio::test]
    async fn test_top_news_truncates_to_most_recent() {
        let aggregator = Aggregator::new(
            StubProvider::new("A").with(
                "technology",
                &["2024-01-01T00:00:00Z", "2024-01-05T00:00:00Z", "2024-01-03T00:00:00Z"],
            ),
            StubProvider::new("B").with(
                "technology",
                &["2024-01-04T00:00:00Z", "2024-01-02T00:00:00Z"],
            ),
            CategorySet::default(),
        );

        let top = aggregator.top_news_by_category("technology", 3).await.unwrap();

        assert_eq!(top.len(), 3);
        assert_eq!(
            titles(&top),
            ["A-technology-1", "B-technology-0", "A-technology-2"]
        );
    }

    #[tokio::test]
    async fn test_top_news_fewer_than_limit() {
        let aggregator = Aggregator::new(
            StubProvider::new("A").with("sports", &["2024-01-01T00:00:00Z"]),
            StubProvider::new("B"),
            CategorySet::default(),
        );

        let top = aggregator
            .top_news_by_category("sports", DEFAULT_TOP_LIMIT)
            .await
            .unwrap();
        assert_eq!(top.len(), 1);
    }

    #[tokio::test]
    async fn test_top_news_zero_limit_is_empty() {
        let aggregator = Aggregator::new(
            StubProvider::new("A").with("sports", &["2024-01-01T00:00:00Z"]),
            StubProvider::new("B"),
            CategorySet::default(),
        );

        let top = aggregator.top_news_by_category("sports", 0).await.unwrap();
        assert!(top.is_empty());
        assert_eq!(aggregator.primary.calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_category_makes_no_calls() {
        let aggregator = Aggregator::new(
            StubProvider::new("A"),
            StubProvider::new("B"),
            CategorySet::default(),
        );

        let err = aggregator
            .top_news_by_category("not-a-real-category", 5)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidCategory(ref c) if c == "not-a-real-category"));
        assert_eq!(aggregator.primary.calls(), 0);
        assert_eq!(aggregator.secondary.calls(), 0);
    }

    #[tokio::test]
    async fn test_failing_provider_does_not_affect_the_other() {
        let (guardian_endpoint, _server) = serve_once(
            200,
            r#"{"response":{"results":[{"webUrl":"https://www.theguardian.com/x",
                "webPublicationDate":"2024-01-01T00:00:00Z",
                "fields":{"headline":"From Guardian"}}]}}"#,
        )
        .await;

        let settings = Settings {
            categories: vec!["business".into()],
            request_timeout_secs: 5,
            news_api: NewsApiSettings {
                endpoint: closed_endpoint().await,
                api_key: Some("k".into()),
                ..NewsApiSettings::default()
            },
            guardian: GuardianSettings {
                endpoint: guardian_endpoint,
                api_key: Some("k".into()),
                ..GuardianSettings::default()
            },
            ..Settings::default()
        };
        let aggregator = Aggregator::from_settings(&settings).unwrap();

        let top = aggregator.top_news_by_category("business", 10).await.unwrap();

        assert_eq!(top.len(), 1);
        assert_eq!(top[0].title.as_deref(), Some("From Guardian"));
        assert_eq!(top[0].source, "The Guardian");
        assert_eq!(top[0].category, "business");
    }
}
