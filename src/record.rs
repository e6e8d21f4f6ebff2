use crate::error::{Result, SnapshotError};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use url::Url;

/// Error a fetch terminated with, as reported by the crawler.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FetchError {
    /// Error class name, e.g. `TimeoutError`.
    pub kind: String,
    #[serde(default)]
    pub message: String,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Terminal result of fetching one URL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutcomeRecord {
    pub url: Url,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub exception: Option<FetchError>,
    #[serde(default)]
    pub next_url: Option<Url>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub last_modified: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub num_new_urls: u64,
    #[serde(default)]
    pub num_urls: u64,
}

impl OutcomeRecord {
    /// A bare record for `url` with every optional field unset.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            status: None,
            exception: None,
            next_url: None,
            content_type: None,
            encoding: None,
            last_modified: None,
            size: 0,
            num_new_urls: 0,
            num_urls: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RunMetadata {
    pub t0: DateTime<Utc>,
    /// Unset while the crawl is still running.
    #[serde(default)]
    pub t1: Option<DateTime<Utc>>,
    pub max_tasks: u32,
    /// Queue size when the snapshot was taken.
    #[serde(default)]
    pub todo: u64,
}

impl RunMetadata {
    /// Seconds between `t0` and `t1`, or between `t0` and `now` for an open run.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> f64 {
        let end = self.t1.unwrap_or(now);
        (end - self.t0)
            .num_microseconds()
            .map(|us| us as f64 / 1_000_000.0)
            .unwrap_or_else(|| (end - self.t0).num_milliseconds() as f64 / 1000.0)
    }

    /// Completed URLs per second per task; zero when `dt` or `max_tasks` is zero.
    pub fn speed(&self, done: usize, dt: f64) -> f64 {
        if dt != 0.0 && self.max_tasks != 0 {
            done as f64 / dt / self.max_tasks as f64
        } else {
            0.0
        }
    }
}

/// Everything a crawl hands over for reporting.
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlSnapshot {
    #[serde(flatten)]
    pub meta: RunMetadata,
    #[serde(default)]
    pub done: Vec<OutcomeRecord>,
}

impl CrawlSnapshot {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SnapshotError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}
