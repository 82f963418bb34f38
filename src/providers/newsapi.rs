//! NewsAPI `top-headlines` adapter.
//!
//! Queries `https://newsapi.org/v2/top-headlines` with the category passed as
//! `category`, the key as `apiKey`, and a fixed `language`.

use super::{NewsProvider, ProviderError, fail_open, get_json};
use crate::config::NewsApiSettings;
use crate::error::Result;
use crate::models::Article;
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;
use url::Url;

pub const LABEL: &str = "NewsAPI";

/// Response body of `top-headlines`.
#[derive(Debug, Deserialize)]
struct TopHeadlines {
    articles: Vec<Headline>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Headline {
    title: Option<String>,
    author: Option<String>,
    description: Option<String>,
    url: String,
    published_at: Option<String>,
}

impl Headline {
    fn into_article(self, category: &str) -> Article {
        Article {
            title: self.title,
            author: self.author,
            description: self.description,
            url: self.url,
            category: category.to_string(),
            source: LABEL.to_string(),
            published_at: self.published_at.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewsApi {
    client: Client,
    endpoint: Url,
    api_key: String,
    language: String,
}

impl NewsApi {
    pub fn new(client: Client, settings: &NewsApiSettings) -> Result<Self> {
        Ok(Self {
            client,
            endpoint: Url::parse(&settings.endpoint)?,
            api_key: settings.api_key.clone().unwrap_or_default(),
            language: settings.language.clone(),
        })
    }

    async fn try_fetch(&self, category: &str) -> std::result::Result<Vec<Article>, ProviderError> {
        let query = [
            ("category", category),
            ("apiKey", self.api_key.as_str()),
            ("language", self.language.as_str()),
        ];
        let body: TopHeadlines = get_json(&self.client, &self.endpoint, &query).await?;
        Ok(normalize(body, category))
    }
}

fn normalize(body: TopHeadlines, category: &str) -> Vec<Article> {
    body.articles
        .into_iter()
        .map(|headline| headline.into_article(category))
        .collect()
}

impl NewsProvider for NewsApi {
    fn label(&self) -> &str {
        LABEL
    }

    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, category: &str) -> Vec<Article> {
        fail_open(LABEL, category, self.try_fetch(category).await)
    }
}
