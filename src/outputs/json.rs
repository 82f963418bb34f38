//! JSON snapshot output.
//!
//! Files are organized by local date, named after the edition (time of day)
//! and, for single-category lookups, the category:
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── morning.json
//!     └── evening_science.json
//! ```

use crate::models::{AggregatedNews, Edition};
use crate::utils::time_of_day;
use chrono::Local;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Wrap `news` in an [`Edition`] stamped with the current local time.
pub fn edition_now(news: AggregatedNews) -> Edition {
    let now = Local::now();
    Edition {
        local_date: now.date_naive().to_string(),
        time_of_day: time_of_day(),
        local_time: now.time().to_string(),
        news,
    }
}

/// Path the edition is written to, relative to `json_output_dir`.
pub fn edition_path(json_output_dir: &str, edition: &Edition, category: Option<&str>) -> PathBuf {
    let file_name = match category {
        Some(category) => format!("{}_{}.json", edition.time_of_day, category),
        None => format!("{}.json", edition.time_of_day),
    };
    PathBuf::from(json_output_dir)
        .join(&edition.local_date)
        .join(file_name)
}

/// Write an [`Edition`] as JSON under a date-named directory.
///
/// Returns the path that was written.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_edition(
    edition: &Edition,
    json_output_dir: &str,
    category: Option<&str>,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(edition)?;
    let path = edition_path(json_output_dir, edition, category);

    if let Some(dir) = path.parent() {
        info!(dir = %dir.display(), "Ensuring JSON directory exists");
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote JSON edition");
    Ok(path)
}
