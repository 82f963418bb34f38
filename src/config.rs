//! Runtime settings.
//!
//! Settings come from an optional YAML file; anything the file leaves out
//! falls back to the defaults below. API keys can additionally be supplied
//! on the command line or through the environment (see [`crate::cli::Cli`]),
//! which takes precedence over the file.
//!
//! # Example
//!
//! ```yaml
//! categories: [business, technology, science]
//! max_concurrent_categories: 2
//! request_timeout_secs: 5
//! news_api:
//!   api_key: "..."
//!   language: en
//! guardian:
//!   api_key: "..."
//! ```

use crate::error::{Error, Result};
use crate::models::{CategorySet, DEFAULT_CATEGORIES};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub const NEWS_API_ENDPOINT: &str = "https://newsapi.org/v2/top-headlines";
pub const GUARDIAN_ENDPOINT: &str = "https://content.guardianapis.com/search";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Categories to aggregate, in output order.
    pub categories: Vec<String>,
    /// How many categories `all` fetches at once. `1` walks them one by one.
    pub max_concurrent_categories: usize,
    /// Upper bound for a single provider request.
    pub request_timeout_secs: u64,
    pub news_api: NewsApiSettings,
    pub guardian: GuardianSettings,
}

/// NewsAPI `top-headlines` settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NewsApiSettings {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub language: String,
}

/// Guardian content search settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GuardianSettings {
    pub endpoint: String,
    pub api_key: Option<String>,
    /// Value of the `show-fields` parameter.
    pub show_fields: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            max_concurrent_categories: 4,
            request_timeout_secs: 10,
            news_api: NewsApiSettings::default(),
            guardian: GuardianSettings::default(),
        }
    }
}

impl Default for NewsApiSettings {
    fn default() -> Self {
        Self {
            endpoint: NEWS_API_ENDPOINT.to_string(),
            api_key: None,
            language: "en".to_string(),
        }
    }
}

impl Default for GuardianSettings {
    fn default() -> Self {
        Self {
            endpoint: GUARDIAN_ENDPOINT.to_string(),
            api_key: None,
            show_fields: "headline,byline,trailText".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or use the defaults when no path is given.
    #[instrument(level = "info")]
    pub fn load(path: Option<&str>) -> Result<Self> {
        let settings = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                debug!("No config file given; using defaults");
                Self::default()
            }
        };
        settings.validate()?;
        Ok(settings)
    }

    fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a mapping
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Replace API keys with the ones given on the command line, if any.
    pub fn with_api_keys(mut self, news_api: Option<String>, guardian: Option<String>) -> Self {
        if news_api.is_some() {
            self.news_api.api_key = news_api;
        }
        if guardian.is_some() {
            self.guardian.api_key = guardian;
        }
        self
    }

    /// Reject category lists that would make lookups ambiguous or empty.
    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(Error::Config("at least one category is required".into()));
        }
        let mut seen = HashSet::new();
        for category in &self.categories {
            if category.trim().is_empty() {
                return Err(Error::Config("categories must not be blank".into()));
            }
            if !seen.insert(category.as_str()) {
                return Err(Error::Config(format!("duplicate category: {category}")));
            }
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::Config("request_timeout_secs must be at least 1".into()));
        }
        if self.max_concurrent_categories == 0 {
            return Err(Error::Config(
                "max_concurrent_categories must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Log a warning for each provider that has no API key.
    ///
    /// Requests still go out; the provider will reject them and the adapter
    /// falls back to an empty result.
    pub fn warn_missing_keys(&self) {
        if self.news_api.api_key.is_none() {
            warn!("No NewsAPI key configured (set NEWS_API_KEY); NewsAPI results will be empty");
        }
        if self.guardian.api_key.is_none() {
            warn!("No Guardian key configured (set GUARDIAN_API_KEY); Guardian results will be empty");
        }
    }

    pub fn category_set(&self) -> CategorySet {
        CategorySet::new(self.categories.iter().cloned())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
