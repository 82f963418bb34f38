//! Command-line interface definitions.
//!
//! API keys can be passed as flags or through the environment; everything
//! else that is not a per-run choice lives in the optional YAML config file
//! (see [`crate::config::Settings`]).

use crate::aggregator::DEFAULT_TOP_LIMIT;
use clap::{Parser, Subcommand};

/// Command-line arguments for the news aggregator.
///
/// # Examples
///
/// ```sh
/// # Every category, printed as JSON
/// awful_news_aggregator all
///
/// # Five most recent technology stories, also saved under ./json
/// awful_news_aggregator -j ./json top technology --limit 5
///
/// # Custom categories and endpoints
/// awful_news_aggregator --config ./news.yaml all
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML settings file
    #[arg(short, long)]
    pub config: Option<String>,

    /// NewsAPI key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub news_api_key: Option<String>,

    /// Guardian content API key
    #[arg(long, env = "GUARDIAN_API_KEY", hide_env_values = true)]
    pub guardian_api_key: Option<String>,

    /// Also write the result as a dated JSON edition under this directory
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Fetch every configured category, newest first
    All,
    /// Fetch the most recent stories for a single category
    Top {
        /// Category to look up (must be one of the configured categories)
        category: String,

        /// Maximum number of stories to return
        #[arg(short, long, default_value_t = DEFAULT_TOP_LIMIT)]
        limit: usize,
    },
}
