//! Guardian content search adapter.
//!
//! Queries `https://content.guardianapis.com/search` with the category passed
//! as `section` and asks for the `headline`, `byline` and `trailText` fields.
//! Those fields become the article's title, author and description.

use super::{NewsProvider, ProviderError, fail_open, get_json};
use crate::config::GuardianSettings;
use crate::error::Result;
use crate::models::Article;
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;
use url::Url;

pub const LABEL: &str = "The Guardian";

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    response: SearchResponse,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResult {
    web_url: String,
    web_publication_date: Option<String>,
    #[serde(default)]
    fields: Option<ShowFields>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShowFields {
    headline: Option<String>,
    byline: Option<String>,
    trail_text: Option<String>,
}

impl SearchResult {
    fn into_article(self, category: &str) -> Article {
        let fields = self.fields.unwrap_or_default();
        Article {
            title: fields.headline,
            author: fields.byline,
            description: fields.trail_text,
            url: self.web_url,
            category: category.to_string(),
            source: LABEL.to_string(),
            published_at: self.web_publication_date.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Guardian {
    client: Client,
    endpoint: Url,
    api_key: String,
    show_fields: String,
}

impl Guardian {
    pub fn new(client: Client, settings: &GuardianSettings) -> Result<Self> {
        Ok(Self {
            client,
            endpoint: Url::parse(&settings.endpoint)?,
            api_key: settings.api_key.clone().unwrap_or_default(),
            show_fields: settings.show_fields.clone(),
        })
    }

    async fn try_fetch(&self, category: &str) -> std::result::Result<Vec<Article>, ProviderError> {
        let query = [
            ("section", category),
            ("api-key", self.api_key.as_str()),
            ("show-fields", self.show_fields.as_str()),
        ];
        let body: SearchEnvelope = get_json(&self.client, &self.endpoint, &query).await?;
        Ok(normalize(body, category))
    }
}

fn normalize(body: SearchEnvelope, category: &str) -> Vec<Article> {
    body.response
        .results
        .into_iter()
        .map(|result| result.into_article(category))
        .collect()
}

impl NewsProvider for Guardian {
    fn label(&self) -> &str {
        LABEL
    }

    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, category: &str) -> Vec<Article> {
        fail_open(LABEL, category, self.try_fetch(category).await)
    }
}
