//! Crate-wide error type.
//!
//! Provider failures never show up here: adapters log them and return an
//! empty result (see [`crate::providers::ProviderError`]). What remains are
//! caller mistakes such as an unknown category, and setup problems in the
//! binary (bad config file, unparseable endpoint, HTTP client setup).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The requested category is not part of the configured category set.
    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
