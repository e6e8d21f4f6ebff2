pub mod config;
pub mod content;
pub mod error;
pub mod logging;
pub mod record;
pub mod report;
pub mod stats;
pub mod utils;

pub use content::{ContentClassifier, TextTypes};
pub use record::{CrawlSnapshot, FetchError, OutcomeRecord, RunMetadata};
pub use report::{report, report_at, url_report};
pub use stats::Stats;
