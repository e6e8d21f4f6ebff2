//! Text report over a finished crawl.
//!
//! Each outcome record is classified into exactly one of four branches
//! (failure, redirect, text page, other) and counted in a [`Stats`] store.
//! The report lists every record ordered by the string form of its URL and
//! ends with throughput figures and the sorted counter dump.

use crate::content::ContentClassifier;
use crate::record::{CrawlSnapshot, OutcomeRecord};
use crate::stats::Stats;
use chrono::{DateTime, Local, Utc};
use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// Stand-in for optional values that are unset.
pub const MISSING: &str = "-";

struct Opt<'a, T>(&'a Option<T>);

impl<T: fmt::Display> fmt::Display for Opt<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => value.fmt(f),
            None => f.write_str(MISSING),
        }
    }
}

/// Counts `record` into `stats` and writes its report line.
pub fn url_report<W, C>(
    record: &OutcomeRecord,
    stats: &mut Stats,
    classifier: &C,
    out: &mut W,
) -> io::Result<()>
where
    W: Write,
    C: ContentClassifier + ?Sized,
{
    let url = &record.url;
    let status = Opt(&record.status);

    if let Some(exception) = &record.exception {
        stats.incr("fail");
        stats.incr(format!("fail_{}", exception.kind));
        return writeln!(out, "{} error {}", url, exception);
    }

    if let Some(next_url) = &record.next_url {
        stats.incr("redirect");
        return writeln!(out, "{} {} redirect {}", url, status, next_url);
    }

    let content_type = Opt(&record.content_type);
    let last_modified = Opt(&record.last_modified);
    let encoding = Opt(&record.encoding);

    if classifier.is_text(record.content_type.as_deref()) {
        stats.incr("html");
        stats.add("html_bytes", record.size);
        return writeln!(
            out,
            "{} {} {} {} {} {} {}/{}",
            url,
            status,
            content_type,
            last_modified,
            encoding,
            record.size,
            record.num_new_urls,
            record.num_urls
        );
    }

    if record.status == Some(200) {
        stats.incr(record.content_type.as_deref().unwrap_or(MISSING));
    } else {
        stats.incr("error");
        stats.add("error_bytes", record.size);
        stats.incr(format!("status_{}", status));
    }
    writeln!(
        out,
        "{} {} {} {} {} {}",
        url, status, content_type, last_modified, encoding, record.size
    )
}

/// Writes the full report for `snapshot`, stamped with the current time.
///
/// Setting `interrupt` while records are being listed stops the listing;
/// the summary is still written from whatever was counted so far.
pub fn report<W, C>(
    snapshot: &CrawlSnapshot,
    classifier: &C,
    interrupt: &AtomicBool,
    out: &mut W,
) -> io::Result<Stats>
where
    W: Write,
    C: ContentClassifier + ?Sized,
{
    report_at(snapshot, classifier, interrupt, Local::now(), out)
}

/// [`report`] with an explicit wall-clock reading.
pub fn report_at<W, C>(
    snapshot: &CrawlSnapshot,
    classifier: &C,
    interrupt: &AtomicBool,
    now: DateTime<Local>,
    out: &mut W,
) -> io::Result<Stats>
where
    W: Write,
    C: ContentClassifier + ?Sized,
{
    let meta = &snapshot.meta;
    let done = snapshot.done.len();
    let dt = meta.elapsed_secs(now.with_timezone(&Utc));
    let speed = meta.speed(done, dt);
    let mut stats = Stats::new();

    debug!(records = done, dt, "[report] Generating report");
    writeln!(out, "*** Report ***")?;

    let mut show: Vec<&OutcomeRecord> = snapshot.done.iter().collect();
    show.sort_by_cached_key(|record| record.url.to_string());

    for (processed, record) in show.into_iter().enumerate() {
        if interrupt.load(Ordering::SeqCst) {
            warn!(processed, total = done, "[report] Interrupted");
            writeln!(out, "\nInterrupted")?;
            break;
        }
        url_report(record, &mut stats, classifier, out)?;
    }

    writeln!(
        out,
        "Finished {} urls in {:.3} secs (max_tasks={}) ({:.3} urls/sec/task)",
        done, dt, meta.max_tasks, speed
    )?;
    stats.dump(out)?;
    writeln!(out, "Todo: {}", meta.todo)?;
    writeln!(out, "Done: {}", done)?;
    writeln!(out, "Date: {} local time", now.format("%a %b %e %H:%M:%S %Y"))?;

    Ok(stats)
}
