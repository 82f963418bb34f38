//! # Awful News Aggregator
//!
//! Pulls stories from two providers, NewsAPI top headlines and The Guardian
//! content search, normalizes them into one article schema, groups them by
//! category and orders them newest first.
//!
//! ## Usage
//!
//! ```sh
//! NEWS_API_KEY=... GUARDIAN_API_KEY=... awful_news_aggregator all
//! awful_news_aggregator top technology --limit 5
//! ```
//!
//! ## Architecture
//!
//! 1. **Providers**: one adapter per external API; failures are logged and
//!    yield no articles instead of an error
//! 2. **Aggregation**: both providers are queried concurrently per category,
//!    categories are fanned out with a concurrency bound
//! 3. **Organizing**: merged lists are stable-sorted by publication time
//! 4. **Output**: JSON on stdout, optionally a dated JSON edition on disk
//!
//! Logs go to stderr (`RUST_LOG` controls the filter, default `info`).

use clap::Parser;
use itertools::Itertools;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregator;
mod cli;
mod config;
mod error;
mod models;
mod organizer;
mod outputs;
mod providers;
mod utils;

use aggregator::Aggregator;
use cli::{Cli, Command};
use config::Settings;
use models::AggregatedNews;
use outputs::json;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_aggregator starting up");

    let args = Cli::parse();
    debug!(?args.config, ?args.json_output_dir, ?args.command, "Parsed CLI arguments");

    let settings = match Settings::load(args.config.as_deref()) {
        Ok(settings) => settings.with_api_keys(args.news_api_key.clone(), args.guardian_api_key.clone()),
        Err(e) => {
            error!(config = ?args.config, error = %e, "Failed to load settings");
            return Err(e.into());
        }
    };
    settings.warn_missing_keys();

    // Early check so a bad output path fails before any fetching
    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(path = %dir, error = %e, "JSON output directory is not writable");
            return Err(e);
        }
    }

    let aggregator = Aggregator::from_settings(&settings)?;
    info!(
        categories = %aggregator.categories().iter().join(","),
        max_concurrent = settings.max_concurrent_categories,
        timeout_secs = settings.request_timeout_secs,
        "Aggregator ready"
    );

    let (news, category) = match &args.command {
        Command::All => (aggregator.fetch_all().await, None),
        Command::Top { category, limit } => {
            let articles = match aggregator.top_news_by_category(category, *limit).await {
                Ok(articles) => articles,
                Err(e) => {
                    error!(%category, error = %e, "Top news lookup failed");
                    return Err(e.into());
                }
            };
            let mut news = AggregatedNews::default();
            news.insert(category.as_str(), articles);
            (news, Some(category.as_str()))
        }
    };

    let summary = news
        .iter()
        .map(|(category, articles)| format!("{category}={}", articles.len()))
        .join(", ");
    info!(total = news.article_count(), %summary, "Articles per category");
    if news.article_count() == 0 {
        warn!("No articles returned; check API keys and provider availability");
    }

    let edition = json::edition_now(news);
    println!("{}", serde_json::to_string_pretty(&edition.news)?);

    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = json::write_edition(&edition, dir, category).await {
            error!(error = %e, "Failed to write JSON edition");
            return Err(e);
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
