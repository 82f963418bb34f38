//! Provider adapters for the external news APIs.
//!
//! Each adapter knows one HTTP contract and turns its response into
//! [`Article`]s for a single requested category.
//!
//! # Supported Providers
//!
//! | Provider | Module | Category param | Label |
//! |----------|--------|----------------|-------|
//! | NewsAPI top headlines | [`newsapi`] | `category` | `NewsAPI` |
//! | Guardian content search | [`guardian`] | `section` | `The Guardian` |
//!
//! # Failure Policy
//!
//! Adapters never return an error to their caller. Transport errors, non-2xx
//! statuses and bodies that do not match the expected schema are logged with
//! the reason and turned into an empty list, so one provider being down does
//! not take the other provider or the other categories with it. There are no
//! retries.

pub mod guardian;
pub mod newsapi;

use crate::models::Article;
use crate::utils::truncate_for_log;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, instrument};
use url::Url;

/// How much of an unexpected response body ends up in logs.
const BODY_PREVIEW_BYTES: usize = 300;

/// A source of normalized articles for one category at a time.
pub trait NewsProvider {
    /// Fixed label stamped into [`Article::source`].
    fn label(&self) -> &str;

    /// Fetch articles for `category`.
    ///
    /// Infallible by contract: failures are logged and yield an empty list.
    async fn fetch(&self, category: &str) -> Vec<Article>;
}

/// Why a provider request produced no articles.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("malformed response ({source}): {preview}")]
    Decode {
        source: serde_json::Error,
        preview: String,
    },
}

/// Build the HTTP client shared by all adapters.
pub fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// GET `endpoint` with `query` and decode the JSON body into `T`.
#[instrument(level = "debug", skip_all, fields(%endpoint))]
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    endpoint: &Url,
    query: &[(&str, &str)],
) -> Result<T, ProviderError> {
    // The query carries the API key; keep it out of error messages
    let response = client
        .get(endpoint.clone())
        .query(query)
        .send()
        .await
        .map_err(reqwest::Error::without_url)?;
    let status = response.status();
    let body = response.text().await.map_err(reqwest::Error::without_url)?;
    debug!(%status, bytes = body.len(), "Provider responded");

    if !status.is_success() {
        return Err(ProviderError::Status {
            status,
            body: truncate_for_log(&body, BODY_PREVIEW_BYTES),
        });
    }

    serde_json::from_str(&body).map_err(|source| ProviderError::Decode {
        source,
        preview: truncate_for_log(&body, BODY_PREVIEW_BYTES),
    })
}

/// Collapse a provider result into articles, logging the failure if any.
pub(crate) fn fail_open(
    label: &str,
    category: &str,
    result: Result<Vec<Article>, ProviderError>,
) -> Vec<Article> {
    match result {
        Ok(articles) => {
            debug!(source = label, %category, count = articles.len(), "Fetched articles");
            articles
        }
        Err(e) => {
            error!(source = label, %category, error = %e, "Provider fetch failed; treating as empty");
            Vec::new()
        }
    }
}
